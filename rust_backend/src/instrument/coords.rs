//! Coordinate, proper motion and flux formatting for VLTI templates.

use crate::error::{ObError, ObResult};
use crate::models::{Band, Target};

/// Fractional digits required on RA when full precision is requested.
pub const RA_MIN_DIGITS: usize = 3;
/// Fractional digits required on DEC when full precision is requested.
pub const DEC_MIN_DIGITS: usize = 2;
/// Coordinates are truncated to this many fractional digits.
pub const MAX_COORD_DIGITS: usize = 4;

const MAS_PER_DEG: f64 = 3600.0 * 1000.0;

/// Round half away from zero to `digits` decimals.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

fn format_axis(
    target: &str,
    value: &str,
    axis: &'static str,
    required: usize,
    require_precision: bool,
) -> ObResult<String> {
    let fraction = value.rfind('.').map(|w| (w + 1, &value[w + 1..]));
    let digits = fraction.map(|(_, f)| f.chars().count()).unwrap_or(0);
    if digits < required && require_precision {
        return Err(ObError::Precision {
            target: target.to_string(),
            axis,
            required,
        });
    }
    // truncate on a char boundary
    let cut = fraction.and_then(|(start, f)| {
        f.char_indices()
            .nth(MAX_COORD_DIGITS)
            .map(|(offset, _)| start + offset)
    });
    match cut {
        Some(end) => Ok(value[..end].to_string()),
        None => Ok(value.to_string()),
    }
}

/// RA/DEC of `target` formatted for VLTI templates.
///
/// With `require_precision`, RA needs at least 3 and DEC at least 2 fractional digits.
/// Both are truncated (not rounded) to 4 fractional digits.
pub fn get_coords(target: &Target, require_precision: bool) -> ObResult<(String, String)> {
    let ra = format_axis(&target.name, &target.ra, "RA", RA_MIN_DIGITS, require_precision)?;
    let dec = format_axis(&target.name, &target.dec, "DEC", DEC_MIN_DIGITS, require_precision)?;
    Ok((ra, dec))
}

/// Proper motion in arcsec/yr rounded to 4 decimals; absent values count as 0.
pub fn get_pm_coords(target: &Target) -> (f64, f64) {
    let pmra = target.pmra.unwrap_or(0.0);
    let pmdec = target.pmdec.unwrap_or(0.0);
    (round_to(pmra / 1000.0, 4), round_to(pmdec / 1000.0, 4))
}

/// Flux in `band` rounded to 3 decimals.
pub fn get_flux(target: &Target, band: Band) -> ObResult<f64> {
    target
        .flux(band)
        .map(|f| round_to(f, 3))
        .ok_or_else(|| ObError::Validation(format!("Object {} has no FLUX_{}", target.name, band)))
}

fn parse_sexagesimal(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let negative = trimmed.starts_with('-');
    let mut total = 0.0;
    let mut scale = 1.0;
    let mut fields = 0;
    for part in trimmed
        .trim_start_matches(|c: char| c == '+' || c == '-')
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|p| !p.is_empty())
    {
        if fields == 3 {
            return None;
        }
        total += part.parse::<f64>().ok()? / scale;
        scale *= 60.0;
        fields += 1;
    }
    if fields == 0 {
        return None;
    }
    Some(if negative { -total } else { total })
}

fn is_sexagesimal(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.contains(':') || trimmed.contains(char::is_whitespace)
}

/// Right ascension in degrees from decimal degrees or `HH:MM:SS.s`.
pub fn parse_ra_deg(ra: &str) -> ObResult<f64> {
    let parsed = if is_sexagesimal(ra) {
        parse_sexagesimal(ra).map(|hours| hours * 15.0)
    } else {
        ra.trim().parse::<f64>().ok()
    };
    parsed.ok_or_else(|| ObError::Validation(format!("cannot parse right ascension '{}'", ra)))
}

/// Declination in degrees from decimal degrees or `±DD:MM:SS.s`.
pub fn parse_dec_deg(dec: &str) -> ObResult<f64> {
    let parsed = if is_sexagesimal(dec) {
        parse_sexagesimal(dec)
    } else {
        dec.trim().parse::<f64>().ok()
    };
    parsed.ok_or_else(|| ObError::Validation(format!("cannot parse declination '{}'", dec)))
}

/// Offset of the science star from the fringe-tracking star, in mas.
///
/// Returns `[Δα·cos δ_ft, Δδ]`; the RA difference is wrapped to [-180°, 180°).
pub fn sky_diff(ra: &str, dec: &str, ft_ra: &str, ft_dec: &str) -> ObResult<[f64; 2]> {
    let sc_ra = parse_ra_deg(ra)?;
    let sc_dec = parse_dec_deg(dec)?;
    let ft_ra = parse_ra_deg(ft_ra)?;
    let ft_dec = parse_dec_deg(ft_dec)?;

    let d_ra = (sc_ra - ft_ra + 180.0).rem_euclid(360.0) - 180.0;
    let ra_offset = d_ra * ft_dec.to_radians().cos();
    let dec_offset = sc_dec - ft_dec;
    Ok([ra_offset * MAS_PER_DEG, dec_offset * MAS_PER_DEG])
}
