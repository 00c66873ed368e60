// hf-core/src/units.rs

use uom::si::f64::{
    Ratio as UomRatio, Time as UomTime, Volume as UomVolume, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Ratio = UomRatio;
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type FlowRate = UomVolumeRate;

#[inline]
pub fn l(v: f64) -> Volume {
    use uom::si::volume::liter;
    Volume::new::<liter>(v)
}

#[inline]
pub fn lpm(v: f64) -> FlowRate {
    use uom::si::volume_rate::liter_per_minute;
    FlowRate::new::<liter_per_minute>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn minutes(v: f64) -> Time {
    use uom::si::time::minute;
    Time::new::<minute>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// A percentage-scaled input (e.g. `50.0` for half).
///
/// Table columns carry percentages; entering them through `pct` keeps the
/// /100 scaling inside the type instead of scattered across formulas.
#[inline]
pub fn pct(v: f64) -> Ratio {
    use uom::si::ratio::percent;
    Ratio::new::<percent>(v)
}

/// Blood volume moved by the circulation during one discrete time step:
/// the per-minute rate divided into `steps` equal slices.
#[inline]
pub fn per_step_volume(rate: FlowRate, steps: u32) -> Volume {
    rate * minutes(1.0) / unitless(steps as f64)
}
