//! Built-in seawater properties for reference-composition seawater
//!
//! - depth from pressure: Saunders & Fofonoff (1976) as given in UNESCO
//!   technical paper 44 (1983)
//! - absolute salinity: reference salinity `SR = uPS * SP` with zero
//!   absolute salinity anomaly
//! - conservative temperature: potential temperature referenced to 0 dbar,
//!   Fofonoff & Millard (1983) with the Bryden (1973) adiabatic lapse rate
//! - sound speed: Chen & Millero (1977), UNESCO (1983)
//!
//! The EOS-80 algorithms work on IPTS-68 temperatures; ITS-90 inputs are
//! converted with `T68 = 1.00024 * T90` and back.

use super::{PhysicsResult, SeawaterPhysics, check_range, finite};

/// Ratio of reference salinity to practical salinity, g/kg
pub const UPS: f64 = 35.16504 / 35.0;

const T68_PER_T90: f64 = 1.00024;

const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
const LONGITUDE_RANGE: (f64, f64) = (-360.0, 360.0);
const PRESSURE_RANGE: (f64, f64) = (-1.5, 12_000.0);
const PRACTICAL_SALINITY_RANGE: (f64, f64) = (0.0, 42.0);
const ABSOLUTE_SALINITY_RANGE: (f64, f64) = (0.0, 42.0 * UPS);
const TEMPERATURE_RANGE: (f64, f64) = (-3.0, 40.0);

#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceSeawater;

impl ReferenceSeawater {
    pub fn new() -> Self {
        Self
    }
}

impl SeawaterPhysics for ReferenceSeawater {
    fn z_from_pressure(&self, pressure: f64, latitude: f64) -> PhysicsResult<f64> {
        let p = check_range("pressure", pressure, PRESSURE_RANGE.0, PRESSURE_RANGE.1)?;
        let lat = check_range("latitude", latitude, LATITUDE_RANGE.0, LATITUDE_RANGE.1)?;

        finite("z_from_pressure", -depth_from_pressure(p, lat))
    }

    fn absolute_salinity_from_practical(
        &self,
        salinity: f64,
        pressure: f64,
        longitude: f64,
        latitude: f64,
    ) -> PhysicsResult<f64> {
        let sp = check_range(
            "practical salinity",
            salinity,
            PRACTICAL_SALINITY_RANGE.0,
            PRACTICAL_SALINITY_RANGE.1,
        )?;
        check_range("pressure", pressure, PRESSURE_RANGE.0, PRESSURE_RANGE.1)?;
        check_range("longitude", longitude, LONGITUDE_RANGE.0, LONGITUDE_RANGE.1)?;
        check_range("latitude", latitude, LATITUDE_RANGE.0, LATITUDE_RANGE.1)?;

        finite("absolute_salinity_from_practical", UPS * sp)
    }

    fn conservative_temperature_from_insitu(
        &self,
        absolute_salinity: f64,
        in_situ_temperature: f64,
        pressure: f64,
    ) -> PhysicsResult<f64> {
        let sa = check_absolute_salinity(absolute_salinity)?;
        let t = check_range(
            "in-situ temperature",
            in_situ_temperature,
            TEMPERATURE_RANGE.0,
            TEMPERATURE_RANGE.1,
        )?;
        let p = check_range("pressure", pressure, PRESSURE_RANGE.0, PRESSURE_RANGE.1)?;

        let theta68 = potential_temperature(sa / UPS, t * T68_PER_T90, p, 0.0);
        finite("conservative_temperature_from_insitu", theta68 / T68_PER_T90)
    }

    fn sound_speed(
        &self,
        absolute_salinity: f64,
        conservative_temperature: f64,
        pressure: f64,
    ) -> PhysicsResult<f64> {
        let sa = check_absolute_salinity(absolute_salinity)?;
        let ct = check_range(
            "conservative temperature",
            conservative_temperature,
            TEMPERATURE_RANGE.0,
            TEMPERATURE_RANGE.1,
        )?;
        let p = check_range("pressure", pressure, PRESSURE_RANGE.0, PRESSURE_RANGE.1)?;

        let sp = sa / UPS;
        let t68 = potential_temperature(sp, ct * T68_PER_T90, 0.0, p);
        finite("sound_speed", chen_millero_sound_speed(sp, t68, p))
    }
}

fn check_absolute_salinity(value: f64) -> PhysicsResult<f64> {
    check_range(
        "absolute salinity",
        value,
        ABSOLUTE_SALINITY_RANGE.0,
        ABSOLUTE_SALINITY_RANGE.1,
    )
}

/// Depth in metres for sea pressure `p` (dbar) at latitude `lat` (deg)
fn depth_from_pressure(p: f64, lat: f64) -> f64 {
    let x = lat.to_radians().sin().powi(2);
    let gravity = 9.780318 * (1.0 + (5.2788e-3 + 2.36e-5 * x) * x) + 1.092e-6 * p;
    (((-1.82e-15 * p + 2.279e-10) * p - 2.2512e-5) * p + 9.72659) * p / gravity
}

/// Adiabatic lapse rate in deg C/dbar (IPTS-68)
fn adiabatic_lapse_rate(s: f64, t: f64, p: f64) -> f64 {
    let ds = s - 35.0;
    (((-2.1687e-16 * t + 1.8676e-14) * t - 4.6206e-13) * p
        + ((2.7759e-12 * t - 1.1351e-10) * ds
            + ((-5.4481e-14 * t + 8.733e-12) * t - 6.7795e-10) * t
            + 1.8741e-8))
        * p
        + (-4.2393e-8 * t + 1.8932e-6) * ds
        + ((6.6228e-10 * t - 6.836e-8) * t + 8.5258e-6) * t
        + 3.5803e-5
}

/// Temperature of a parcel moved adiabatically from `p0` to `pr` (IPTS-68)
///
/// Fourth order Runge-Kutta integration of the lapse rate.
fn potential_temperature(s: f64, t0: f64, p0: f64, pr: f64) -> f64 {
    let h = pr - p0;
    let mut xk = h * adiabatic_lapse_rate(s, t0, p0);
    let mut t = t0 + 0.5 * xk;
    let mut q = xk;
    let mut p = p0 + 0.5 * h;

    xk = h * adiabatic_lapse_rate(s, t, p);
    t += 0.292_893_22 * (xk - q);
    q = 0.585_786_44 * xk + 0.121_320_344 * q;

    xk = h * adiabatic_lapse_rate(s, t, p);
    t += 1.707_106_781 * (xk - q);
    q = 3.414_213_562 * xk - 4.121_320_344 * q;
    p += 0.5 * h;

    xk = h * adiabatic_lapse_rate(s, t, p);
    t + (xk - 2.0 * q) / 6.0
}

/// Speed of sound in m/s; `s` practical salinity, `t` IPTS-68, `p` dbar
fn chen_millero_sound_speed(s: f64, t: f64, p: f64) -> f64 {
    let sr = s.abs().sqrt();
    let p = p / 10.0; // bar

    let d = 1.727e-3 - 7.9836e-6 * p;

    let b1 = 7.3637e-5 + 1.7945e-7 * t;
    let b0 = -1.922e-2 - 4.42e-5 * t;
    let b = b0 + b1 * p;

    let a3 = (-3.389e-13 * t + 6.649e-12) * t + 1.100e-10;
    let a2 = ((7.988e-12 * t - 1.6002e-10) * t + 9.1041e-9) * t - 3.9064e-7;
    let a1 = (((-2.0122e-10 * t + 1.0507e-8) * t - 6.4885e-8) * t - 1.2580e-5) * t + 9.4742e-5;
    let a0 = (((-3.21e-8 * t + 2.006e-6) * t + 7.164e-5) * t - 1.262e-2) * t + 1.389;
    let a = ((a3 * p + a2) * p + a1) * p + a0;

    let c3 = (-2.3643e-12 * t + 3.8504e-10) * t - 9.7729e-9;
    let c2 = (((1.0405e-12 * t - 2.5335e-10) * t + 2.5974e-8) * t - 1.7107e-6) * t + 3.1260e-5;
    let c1 = (((-6.1185e-10 * t + 1.3621e-7) * t - 8.1788e-6) * t + 6.8982e-4) * t + 0.153563;
    let c0 = ((((3.1464e-9 * t - 1.47800e-6) * t + 3.3420e-4) * t - 5.80852e-2) * t + 5.03711)
        * t
        + 1402.388;
    let c = ((c3 * p + c2) * p + c1) * p + c0;

    c + (a + b * sr + d * s) * s
}
