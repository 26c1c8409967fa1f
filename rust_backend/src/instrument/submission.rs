//! Creation of a GRAVITY OB on P2 from a [`PreparedOb`].

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use super::coords::round_to;
use super::gravity::{sanitize_name, ObjectType, PreparedOb, INSTRUMENT_NAME};
use super::VltiInstrument;
use crate::error::{ObError, ObResult};
use crate::p2::{ContainerId, ObId, P2Api, SiderealTimeInterval, VerifyResponse};
use crate::params::keywords::*;
use crate::ui::Ui;

/// P2 limit on the OB description name.
pub const MAX_OB_NAME_LEN: usize = 31;

/// An OB created on P2 and its verification result.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedOb {
    pub ob_id: ObId,
    pub name: String,
    pub verification: VerifyResponse,
}

fn field(dual_field: bool) -> &'static str {
    if dual_field {
        "dual"
    } else {
        "single"
    }
}

/// `GRAVITY_single_acq` or `GRAVITY_dual_acq`.
pub fn acquisition_template_name(dual_field: bool) -> String {
    format!("{}_{}_acq", INSTRUMENT_NAME, field(dual_field))
}

/// `GRAVITY_{single|dual}_obs_{exp|calibrator}`.
pub fn observation_template_name(object_type: ObjectType, dual_field: bool) -> String {
    let kind = match object_type {
        ObjectType::Science => "exp",
        ObjectType::Calibrator => "calibrator",
    };
    format!("{}_{}_obs_{}", INSTRUMENT_NAME, field(dual_field), kind)
}

/// `SCI_HD_1234_GRAVITY_A0B2C1D0_MEDIUM-COMBINED`
pub fn ob_name(
    object_type: ObjectType,
    science_name: &str,
    baseline: &str,
    instrument_mode: &str,
) -> String {
    format!(
        "{}_{}_{}_{}_{}",
        &object_type.as_str()[..3],
        sanitize_name(science_name),
        INSTRUMENT_NAME,
        baseline.replace('-', ""),
        instrument_mode
    )
}

pub fn user_comment(username: &str, timestamp: DateTime<Utc>) -> String {
    format!(
        "Generated by {} from Aspro2 export on {}",
        username,
        timestamp.format("%Y-%m-%dT%H:%M:%SZ")
    )
}

/// Split `"HH:MM/HH:MM"` into a sidereal time window.
pub fn parse_lst_interval(lst: &str) -> ObResult<SiderealTimeInterval> {
    let mut bounds = lst.split('/');
    match (bounds.next(), bounds.next()) {
        (Some(from), Some(to)) => Ok(SiderealTimeInterval {
            from: from.trim().to_string(),
            to: to.trim().to_string(),
        }),
        _ => Err(ObError::Validation(format!(
            "LST interval '{}' is not of the form HH:MM/HH:MM",
            lst
        ))),
    }
}

/// Values of the acquisition template: the validated set plus guiding and, in dual field,
/// fringe-tracker keywords.
pub fn acquisition_values(prepared: &PreparedOb) -> Map<String, Value> {
    let mut values = prepared.acquisition.to_json_map();
    let guide = &prepared.guide_star;
    values.insert(SEQ_INS_SOBJ_DIAMETER.to_string(), json!(prepared.diameter));
    values.insert(SEQ_INS_SOBJ_VIS.to_string(), json!(prepared.visibility));
    values.insert(COU_AG_GSSOURCE.to_string(), json!(guide.source.as_str()));
    values.insert(COU_AG_ALPHA.to_string(), json!(guide.ra));
    values.insert(COU_AG_DELTA.to_string(), json!(guide.dec));
    values.insert(COU_GS_MAG.to_string(), json!(round_to(guide.mag, 3)));
    values.insert(TEL_TARG_PARALLAX.to_string(), json!(0.0));

    if let Some(dual) = &prepared.dual_field {
        values.insert(SEQ_INS_SOBJ_X.to_string(), json!(dual.offset[0]));
        values.insert(SEQ_INS_SOBJ_Y.to_string(), json!(dual.offset[1]));
        values.insert(SEQ_FT_ROBJ_NAME.to_string(), json!(dual.ft_name));
        values.insert(SEQ_FT_ROBJ_MAG.to_string(), json!(round_to(dual.ft_mag, 3)));
        values.insert(SEQ_FT_ROBJ_DIAMETER.to_string(), json!(dual.ft_diameter));
        values.insert(SEQ_FT_ROBJ_VIS.to_string(), json!(dual.ft_vis));
        values.insert(SEQ_FT_MODE.to_string(), json!("AUTO"));
    }
    values
}

/// Values of the observation template. Dual-field science adds zero relative offsets.
pub fn observation_values(prepared: &PreparedOb) -> Map<String, Value> {
    let mut values = prepared.observation.to_json_map();
    if prepared.is_dual_field() && prepared.object_type == ObjectType::Science {
        values.insert(SEQ_RELOFF_X.to_string(), json!("0.0"));
        values.insert(SEQ_RELOFF_Y.to_string(), json!("0.0"));
    }
    values
}

/// Create the OB in `container_id`, attach both templates and verify it.
///
/// Progress is reported at each step. A failing call stops the submission and leaves what
/// was already created on P2.
pub fn create_gravity_ob(
    instrument: &VltiInstrument,
    username: &str,
    api: &mut dyn P2Api,
    ui: &mut dyn Ui,
    container_id: ContainerId,
    prepared: &PreparedOb,
    instrument_mode: &str,
) -> ObResult<SubmittedOb> {
    ui.set_progress(0.1);

    let science_name = prepared.acquisition.get(SEQ_INS_SOBJ_NAME)?.to_string();
    let baseline = prepared.constraints.baseline().unwrap_or_default();
    let name = ob_name(prepared.object_type, &science_name, baseline, instrument_mode);

    let (mut ob, version) = api.create_ob(container_id, &name)?;
    let ob_id = ob.ob_id;
    log::info!("Created OB {} '{}' in {}", ob_id.value(), name, container_id);

    ob.obs_description.name = name.chars().take(MAX_OB_NAME_LEN).collect();
    ob.obs_description.user_comments = user_comment(username, Utc::now());
    ob.target.extend(prepared.target.params().to_json_map());
    ob.constraints.extend(prepared.constraints.params().to_json_map());
    let (ob, _) = api.save_ob(&ob, &version)?;

    if let Some(lst) = prepared.lst_interval.as_deref() {
        let interval = parse_lst_interval(lst)?;
        let (_, stc_version) = api.get_sidereal_time_constraints(ob_id)?;
        api.save_sidereal_time_constraints(ob_id, &[interval], &stc_version)?;
    }
    ui.set_progress(0.2);

    let dual = prepared.is_dual_field();
    let (tpl, tpl_version) = api.create_template(ob_id, &acquisition_template_name(dual))?;
    api.set_template_params(ob_id, &tpl, &acquisition_values(prepared), &tpl_version)?;
    ui.set_progress(0.3);

    let (tpl, tpl_version) = api.create_template(
        ob_id,
        &observation_template_name(prepared.object_type, dual),
    )?;
    ui.set_progress(0.4);

    api.set_template_params(ob_id, &tpl, &observation_values(prepared), &tpl_version)?;
    ui.set_progress(0.5);

    let (response, _) = api.verify_ob(ob_id, true)?;
    ui.set_progress(1.0);
    instrument.show_p2_response(ui, &response, &ob, ob_id);

    Ok(SubmittedOb {
        ob_id,
        name: ob.name.clone(),
        verification: response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_template_names() {
        assert_eq!(acquisition_template_name(false), "GRAVITY_single_acq");
        assert_eq!(acquisition_template_name(true), "GRAVITY_dual_acq");
        assert_eq!(
            observation_template_name(ObjectType::Science, false),
            "GRAVITY_single_obs_exp"
        );
        assert_eq!(
            observation_template_name(ObjectType::Calibrator, true),
            "GRAVITY_dual_obs_calibrator"
        );
    }

    #[test]
    fn test_ob_name() {
        let name = ob_name(
            ObjectType::Calibrator,
            "HD 1234 (B)",
            "A0-B2-C1-D0",
            "MEDIUM-COMBINED",
        );
        assert_eq!(name, "CAL_HD_1234_B__GRAVITY_A0B2C1D0_MEDIUM-COMBINED");
        assert!(name.len() > MAX_OB_NAME_LEN);
    }

    #[test]
    fn test_user_comment() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            user_comment("jdoe", ts),
            "Generated by jdoe from Aspro2 export on 2026-03-04T05:06:07Z"
        );
    }

    #[test]
    fn test_lst_interval() {
        let interval = parse_lst_interval("22:00/03:30").unwrap();
        assert_eq!(interval.from, "22:00");
        assert_eq!(interval.to, "03:30");
        assert!(parse_lst_interval("22:00").is_err());
    }
}
