//! Composable coordinate functions returned by the pipeline.

use std::fmt;
use std::sync::Arc;

use crate::error::ProjError;

type Triple = (f64, f64, f64);

/// Round half away from zero to `decimals` places; `-0.0` becomes `0.0`.
pub fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let r = (value * factor).round() / factor;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

fn round_triple((a, b, c): Triple, decimals: i32) -> Triple {
    (round(a, decimals), round(b, decimals), round(c, decimals))
}

/// A pure three-component coordinate function, cheap to clone and share.
#[derive(Clone)]
pub struct Func(Arc<dyn Fn(f64, f64, f64) -> Triple + Send + Sync>);

impl Func {
    pub fn new(f: impl Fn(f64, f64, f64) -> Triple + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn identity() -> Self {
        Self::new(|a, b, c| (a, b, c))
    }

    pub fn call(&self, a: f64, b: f64, c: f64) -> Triple {
        (self.0)(a, b, c)
    }

    /// Every output component rounded to `decimals` places.
    pub fn round(&self, decimals: i32) -> Self {
        let f = self.clone();
        Self::new(move |a, b, c| round_triple(f.call(a, b, c), decimals))
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Func) -> Self {
        let (f, g) = (self.clone(), next.clone());
        Self::new(move |a, b, c| {
            let (a, b, c) = f.call(a, b, c);
            g.call(a, b, c)
        })
    }

    /// Accept the first two inputs swapped, e.g. latitude before longitude.
    pub fn switch_in(&self) -> Self {
        let f = self.clone();
        Self::new(move |a, b, c| f.call(b, a, c))
    }

    /// Emit the first two outputs swapped, e.g. northing before easting.
    pub fn switch_out(&self) -> Self {
        let f = self.clone();
        Self::new(move |a, b, c| {
            let (a, b, c) = f.call(a, b, c);
            (b, a, c)
        })
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Func")
    }
}

/// Like [`Func`], but may refuse a coordinate.
#[derive(Clone)]
pub struct SafeFunc(Arc<dyn Fn(f64, f64, f64) -> Result<Triple, ProjError> + Send + Sync>);

impl SafeFunc {
    pub fn new(
        f: impl Fn(f64, f64, f64) -> Result<Triple, ProjError> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, a: f64, b: f64, c: f64) -> Result<Triple, ProjError> {
        (self.0)(a, b, c)
    }

    pub fn round(&self, decimals: i32) -> Self {
        let f = self.clone();
        Self::new(move |a, b, c| f.call(a, b, c).map(|t| round_triple(t, decimals)))
    }
}

impl fmt::Debug for SafeFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SafeFunc")
    }
}
