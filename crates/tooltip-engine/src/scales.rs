//! Coordinate adapter over the chart's value-to-pixel scales
//!
//! Scales come in several shapes: the owner may expose a lookup function
//! (`owner.scale("x")`) or a record (`owner.scale.x`), and each entry may be a
//! plain function or an object with an `apply` or `scale` method. The shape is
//! classified once into [`ScaleEntry`] when the adapter is built; invoking a
//! scale afterwards only dispatches on the stored [`TransformKind`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn name(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    /// The entry is itself `value -> pixel`
    Function,
    /// `entry.apply(value)`
    ApplyMethod,
    /// `entry.scale(value)`
    ScaleMethod,
}

impl TransformKind {
    pub fn method_name(&self) -> Option<&'static str> {
        match self {
            TransformKind::Function => None,
            TransformKind::ApplyMethod => Some("apply"),
            TransformKind::ScaleMethod => Some("scale"),
        }
    }
}

/// A classified per-axis scale entry
pub enum ScaleEntry<S> {
    Missing,
    Function(S),
    ApplyMethod(S),
    ScaleMethod(S),
}

impl<S> ScaleEntry<S> {
    pub fn into_axis_scale(self) -> Option<AxisScale<S>> {
        let (kind, handle) = match self {
            ScaleEntry::Missing => return None,
            ScaleEntry::Function(handle) => (TransformKind::Function, handle),
            ScaleEntry::ApplyMethod(handle) => (TransformKind::ApplyMethod, handle),
            ScaleEntry::ScaleMethod(handle) => (TransformKind::ScaleMethod, handle),
        };
        Some(AxisScale { kind, handle })
    }
}

/// How an owner exposes its scales
pub enum ScaleSource<S> {
    Absent,
    /// A function taking the axis name
    Lookup(Box<dyn Fn(Axis) -> ScaleEntry<S>>),
    /// A record with one entry per axis
    PerAxis { x: ScaleEntry<S>, y: ScaleEntry<S> },
}

/// Something that may carry scales: the chart wrapper or the surface
pub trait ScaleOwner {
    type Scale;

    fn scale_source(&self) -> ScaleSource<Self::Scale>;
}

/// Invokes one classified scale on a host value
pub trait ScaleHandle<V> {
    /// `None` when the result is not a number
    fn invoke(&self, kind: TransformKind, value: &V) -> Option<f64>;
}

pub struct AxisScale<S> {
    kind: TransformKind,
    handle: S,
}

impl<S> AxisScale<S> {
    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    /// Pixel position of `value`, or `None` if it is not finite
    pub fn to_pixel<V>(&self, value: &V) -> Option<f64>
    where
        S: ScaleHandle<V>,
    {
        self.handle
            .invoke(self.kind, value)
            .filter(|pixel| pixel.is_finite())
    }
}

/// Which owner the scales were found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleOrigin {
    Wrapper,
    Surface,
}

/// Uniform value→pixel mapping for both axes
pub struct CoordinateAdapter<S> {
    pub x: AxisScale<S>,
    pub y: AxisScale<S>,
    pub origin: ScaleOrigin,
}

impl<S> CoordinateAdapter<S> {
    /// Build from one owner; `None` unless both axes resolve
    pub fn from_owner<O>(owner: &O, origin: ScaleOrigin) -> Option<Self>
    where
        O: ScaleOwner<Scale = S>,
    {
        let (x, y) = match owner.scale_source() {
            ScaleSource::Absent => return None,
            ScaleSource::Lookup(lookup) => (lookup(Axis::X), lookup(Axis::Y)),
            ScaleSource::PerAxis { x, y } => (x, y),
        };
        Some(Self {
            x: x.into_axis_scale()?,
            y: y.into_axis_scale()?,
            origin,
        })
    }

    /// Try the outer wrapper first, then the resolved surface
    pub fn resolve<O>(wrapper: &O, surface: &O) -> Option<Self>
    where
        O: ScaleOwner<Scale = S>,
    {
        Self::from_owner(wrapper, ScaleOrigin::Wrapper)
            .or_else(|| Self::from_owner(surface, ScaleOrigin::Surface))
    }
}
