//! GRAVITY observation block generator.
//!
//! Each observation configuration of an exported block becomes one OB with an acquisition and
//! an observation template. Values come from the target catalogue data (coordinates, proper
//! motion, fluxes), from the lookup tables (DIT) and from a few instrument rules (sky
//! transparency, dual-field separation, exposure timing).

use std::fmt::Write as _;
use std::path::Path;

use super::coords::{get_coords, get_flux, get_pm_coords, sky_diff};
use super::submission::{self, SubmittedOb};
use super::timing::{compute_exposure_timing, ExposureTiming};
use super::VltiInstrument;
use crate::error::{ObError, ObResult};
use crate::models::{Band, ObservationBlock, ObservationConfiguration, ParamValue, Target, Telescope};
use crate::p2::{ContainerId, Folder, P2Api};
use crate::params::keywords::*;
use crate::params::{ObConstraints, ObTarget, TemplateParams};
use crate::tables::{RangeBound, REFERENCE_TELESCOPE};
use crate::ui::Ui;

pub const INSTRUMENT_NAME: &str = "GRAVITY";
/// Acquisition template signature.
pub const ACQ_TSF: &str = "GRAVITY_gen_acq.tsf";
/// Observation template signature, shared by the single/dual and exp/calibrator variants.
pub const OBS_TSF: &str = "GRAVITY_single_obs_exp.tsf";

pub const CONSTRAINTS_NAME: &str = "Aspro-created constraints";
pub const DEFAULT_SEEING: f64 = 1.0;
pub const SKY_OFFSET: i64 = 2000;
/// Guide star coordinates sent when the science star guides itself.
pub const NO_GUIDE_STAR_COORD: &str = "00:00:00.000";

const THIN_CIRRUS: &str = "Variable, thin cirrus";
const CLEAR: &str = "Clear";

const DIT_TABLE_SPECS: [&str; 3] = ["LOW", "MED", "HIGH"];
const DIT_TABLE_POLS: [&str; 2] = ["OUT", "IN"];

/// K magnitude under which thin cirrus are acceptable.
pub fn sky_transparency_mag_limit(tel: Telescope) -> f64 {
    match tel {
        Telescope::AT => 3.0,
        Telescope::UT => 5.0,
    }
}

/// Allowed `[min, max]` separation in mas between science and fringe-tracking stars.
pub fn dual_field_limits(tel: Telescope) -> (f64, f64) {
    match tel {
        Telescope::UT => (0.0, 2000.0),
        Telescope::AT => (0.0, 4000.0),
    }
}

/// Reject a dual-field pair whose RA separation falls outside the telescope limits.
///
/// Only `|Δα·cos δ|` is checked. The limits themselves are accepted.
pub fn check_dual_field_distance(tel: Telescope, ra_offset_mas: f64) -> ObResult<()> {
    let (min, max) = dual_field_limits(tel);
    let distance = ra_offset_mas.abs();
    if distance < min {
        return Err(ObError::DualFieldDistance {
            comparison: "<",
            limit: min,
        });
    }
    if distance > max {
        return Err(ObError::DualFieldDistance {
            comparison: ">",
            limit: max,
        });
    }
    Ok(())
}

/// `OUT` for combined polarization modes, `IN` otherwise.
pub fn polarization(instrument_mode: &str) -> &'static str {
    if instrument_mode.contains("COMBINED") {
        "OUT"
    } else {
        "IN"
    }
}

/// Replace every run of characters outside `[A-Za-z0-9]` by a single `_`.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Science,
    Calibrator,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Science => "SCIENCE",
            ObjectType::Calibrator => "CALIBRATOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideSource {
    /// The science star is used for guiding.
    Science,
    /// A dedicated AO or guide star is given.
    SetupFile,
}

impl GuideSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuideSource::Science => "SCIENCE",
            GuideSource::SetupFile => "SETUPFILE",
        }
    }
}

/// Guiding data written to the acquisition template.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideStar {
    pub source: GuideSource,
    pub ra: String,
    pub dec: String,
    /// V magnitude.
    pub mag: f64,
}

/// Fringe-tracking star of a dual-field observation.
#[derive(Debug, Clone, PartialEq)]
pub struct DualField {
    pub ft_name: String,
    pub ft_mag: f64,
    pub ft_diameter: f64,
    pub ft_vis: f64,
    /// Science star offset from the FT star, `[Δα·cos δ, Δδ]` in mas.
    pub offset: [f64; 2],
}

/// Everything computed for one observation configuration, ready to be sent to P2.
#[derive(Debug, Clone)]
pub struct PreparedOb {
    pub object_type: ObjectType,
    pub target: ObTarget,
    pub constraints: ObConstraints,
    pub acquisition: TemplateParams,
    pub observation: TemplateParams,
    pub timing: ExposureTiming,
    pub diameter: f64,
    pub visibility: f64,
    pub guide_star: GuideStar,
    pub dual_field: Option<DualField>,
    pub lst_interval: Option<String>,
}

impl PreparedOb {
    pub fn is_dual_field(&self) -> bool {
        self.dual_field.is_some()
    }

    pub fn target_name(&self) -> &str {
        self.target.name().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ObReportEntry {
    pub prepared: PreparedOb,
    /// Set when the OB was created on P2.
    pub submitted: Option<SubmittedOb>,
}

/// Outcome of [`Gravity::check_ob`].
#[derive(Debug, Clone)]
pub struct ObReport {
    pub telescope: Telescope,
    pub spectral_resolution: String,
    pub polarization: &'static str,
    /// Container the caller passed in; active again once the block is processed.
    pub container_id: ContainerId,
    /// Folder created for a multi-configuration block.
    pub folder: Option<Folder>,
    pub entries: Vec<ObReportEntry>,
}

/// The GRAVITY instrument.
#[derive(Debug, Clone)]
pub struct Gravity {
    instrument: VltiInstrument,
    username: String,
}

impl Gravity {
    pub fn new(instrument: VltiInstrument, username: impl Into<String>) -> ObResult<Self> {
        if instrument.name() != INSTRUMENT_NAME {
            return Err(ObError::Configuration(format!(
                "instrument '{}' cannot be driven as {}",
                instrument.name(),
                INSTRUMENT_NAME
            )));
        }
        Ok(Self {
            instrument,
            username: username.into(),
        })
    }

    /// Load the GRAVITY tables from `conf_dir`.
    pub fn load<P: AsRef<Path>>(conf_dir: P, username: impl Into<String>) -> ObResult<Self> {
        Self::new(VltiInstrument::load(INSTRUMENT_NAME, conf_dir)?, username)
    }

    pub fn instrument(&self) -> &VltiInstrument {
        &self.instrument
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Spectral resolution label the instrument mode starts with.
    ///
    /// Labels come from the `INS.SPEC.RES` list of the acquisition template; when several
    /// match, the last one in the list wins.
    pub fn spectral_resolution(&self, instrument_mode: &str) -> ObResult<String> {
        let labels = match self.instrument.get_range(ACQ_TSF, INS_SPEC_RES)? {
            RangeBound::List(labels) => labels,
            other => {
                return Err(ObError::Lookup(format!(
                    "{} of {} must be a list, found {:?}",
                    INS_SPEC_RES, ACQ_TSF, other
                )))
            }
        };
        labels
            .iter()
            .filter_map(ParamValue::as_str)
            .filter(|label| instrument_mode.starts_with(*label))
            .last()
            .map(str::to_string)
            .ok_or_else(|| {
                ObError::Validation(format!(
                    "instrument mode '{}' does not start with any spectral resolution of {}",
                    instrument_mode, ACQ_TSF
                ))
            })
    }

    /// Prepare every observation configuration of `ob` and, unless `dry_mode`, create the
    /// OBs on P2 under `container_id`.
    ///
    /// A block with several configurations is submitted into a new folder named after the
    /// first science target. The first failure aborts the block; OBs already created stay.
    pub fn check_ob(
        &self,
        ob: &ObservationBlock,
        api: &mut dyn P2Api,
        ui: &mut dyn Ui,
        container_id: ContainerId,
        dry_mode: bool,
    ) -> ObResult<ObReport> {
        let stations = &ob.interferometer_configuration.stations;
        let telescope = Telescope::from_stations(stations);
        let instrument_mode = &ob.instrument_configuration.instrument_mode;
        let spec = self.spectral_resolution(instrument_mode)?;
        let pol = polarization(instrument_mode);

        log::info!(
            "Checking {} observation(s) on {} in mode {} (spec={}, pol={}, dry={})",
            ob.observation_configuration.len(),
            telescope,
            instrument_mode,
            spec,
            pol,
            dry_mode
        );

        let configurations = &ob.observation_configuration;
        let mut active_container = container_id;
        let mut folder = None;
        if configurations.len() > 1 && !dry_mode {
            let folder_name = sanitize_name(configurations[0].sc_target.name.trim());
            let (created, _) = api.create_folder(container_id, &folder_name)?;
            log::info!("Created folder '{}' ({})", created.name, created.container_id);
            active_container = created.container_id;
            folder = Some(created);
        }

        let mut entries = Vec::with_capacity(configurations.len());
        for configuration in configurations {
            let prepared =
                self.prepare(configuration, telescope, &spec, pol, stations, dry_mode, ui)?;

            let submitted = if dry_mode {
                ui.add_to_log(
                    &format!("{} ready for p2 upload (details logged)", prepared.target_name()),
                    true,
                );
                ui.add_to_log(&prepared.target.to_string(), false);
                ui.add_to_log(&prepared.constraints.to_string(), false);
                ui.add_to_log(&prepared.acquisition.to_string(), false);
                ui.add_to_log(&prepared.observation.to_string(), false);
                None
            } else {
                let submitted = submission::create_gravity_ob(
                    &self.instrument,
                    &self.username,
                    api,
                    ui,
                    active_container,
                    &prepared,
                    instrument_mode,
                )?;
                ui.add_to_log(&format!("{} submitted on p2", prepared.target_name()), true);
                Some(submitted)
            };
            entries.push(ObReportEntry {
                prepared,
                submitted,
            });
        }

        Ok(ObReport {
            telescope,
            spectral_resolution: spec,
            polarization: pol,
            container_id,
            folder,
            entries,
        })
    }

    /// [`Gravity::check_ob`] with submission enabled.
    pub fn submit_ob(
        &self,
        ob: &ObservationBlock,
        api: &mut dyn P2Api,
        ui: &mut dyn Ui,
        container_id: ContainerId,
    ) -> ObResult<ObReport> {
        self.check_ob(ob, api, ui, container_id, false)
    }

    /// Compute the target, constraints and template values of one configuration.
    #[allow(clippy::too_many_arguments)]
    pub fn prepare(
        &self,
        configuration: &ObservationConfiguration,
        telescope: Telescope,
        spec: &str,
        pol: &str,
        stations: &str,
        dry_mode: bool,
        ui: &mut dyn Ui,
    ) -> ObResult<PreparedOb> {
        let ranges = self.instrument.range_table();
        let mut acquisition = TemplateParams::new(ranges.clone(), ACQ_TSF)?;
        let mut observation = TemplateParams::new(ranges.clone(), OBS_TSF)?;
        let mut target = ObTarget::new();
        let mut constraints = ObConstraints::new();

        acquisition.set(INS_SPEC_RES, spec)?;
        acquisition.set(INS_FT_POL, pol)?;
        acquisition.set(INS_SPEC_POL, pol)?;

        let object_type = if configuration.is_science() {
            ObjectType::Science
        } else {
            ObjectType::Calibrator
        };

        let science = &configuration.sc_target;
        let science_name = science.name.trim();
        acquisition.set(SEQ_INS_SOBJ_NAME, science_name)?;
        target.set_name(&science_name.replace(' ', "_"))?;
        let (ra, dec) = get_coords(science, true)?;
        target.set_coords(&ra, &dec)?;
        let (pmra, pmdec) = get_pm_coords(science);
        target.set_proper_motion(pmra, pmdec)?;

        let diameter = science.diameter.unwrap_or(0.0);
        let science_v = get_flux(science, Band::V)?;
        let k = get_flux(science, Band::K)?;
        acquisition.set(SEQ_INS_SOBJ_MAG, k)?;
        acquisition.set(SEQ_FI_HMAG, get_flux(science, Band::H)?)?;

        let dual_field = configuration
            .ft_target
            .as_ref()
            .map(|ft| dual_field(ft, telescope, &ra, &dec))
            .transpose()?;

        let guide_star = match configuration
            .ao_target
            .as_ref()
            .or(configuration.gs_target.as_ref())
        {
            Some(guide) => {
                let (gs_ra, gs_dec) = get_coords(guide, false)?;
                let (pma, pmd) = get_pm_coords(guide);
                acquisition.set(COU_AG_PMA, pma)?;
                acquisition.set(COU_AG_PMD, pmd)?;
                GuideStar {
                    source: GuideSource::SetupFile,
                    ra: gs_ra,
                    dec: gs_dec,
                    mag: get_flux(guide, Band::V)?,
                }
            }
            None => GuideStar {
                source: GuideSource::Science,
                ra: NO_GUIDE_STAR_COORD.to_string(),
                dec: NO_GUIDE_STAR_COORD.to_string(),
                mag: science_v,
            },
        };
        acquisition.set(COU_AG_GSSOURCE, guide_star.source.as_str())?;

        constraints.set_name(CONSTRAINTS_NAME)?;
        if k < sky_transparency_mag_limit(telescope) {
            constraints.set_sky_transparency(THIN_CIRRUS)?;
        } else {
            constraints.set_sky_transparency(CLEAR)?;
        }
        constraints.set_seeing(DEFAULT_SEEING)?;
        constraints.set_baseline(&stations.replace(' ', "-"))?;

        let dit = self
            .instrument
            .get_dit(telescope, spec, pol, k, dual_field.is_some(), dry_mode)?;
        let timing = compute_exposure_timing(dit, ui);
        observation.set(DET2_DIT, timing.dit)?;
        observation.set(DET2_NDIT_OBJECT, timing.ndit)?;
        observation.set(DET2_NDIT_SKY, timing.ndit)?;
        observation.set(SEQ_OBSSEQ, timing.sequence.as_str())?;
        observation.set(SEQ_SKY_X, SKY_OFFSET)?;
        observation.set(SEQ_SKY_Y, SKY_OFFSET)?;

        log::debug!(
            "{}: K={} DIT={} NDIT={} NEXP={} dual={}",
            science_name,
            k,
            timing.dit,
            timing.ndit,
            timing.nexp,
            dual_field.is_some()
        );

        Ok(PreparedOb {
            object_type,
            target,
            constraints,
            acquisition,
            observation,
            timing,
            diameter,
            visibility: 1.0,
            guide_star,
            dual_field,
            lst_interval: configuration
                .lst_interval()
                .filter(|lst| !lst.is_empty())
                .map(str::to_string),
        })
    }

    /// Range table as text, one block per template entry.
    pub fn format_range_table(&self) -> String {
        let mut buffer = String::new();
        for entry in self.instrument.range_table().templates() {
            buffer.push_str(&entry.key);
            buffer.push('\n');
            for (keyword, range) in &entry.keywords {
                let _ = write!(buffer, " {:>30} :", keyword);
                match &range.bound {
                    RangeBound::MinMax { min, max } => {
                        let _ = write!(buffer, " {:.6} ... {:.6} ", min, max);
                    }
                    RangeBound::List(values) => {
                        let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                        let _ = write!(buffer, "[{}]", items.join(", "));
                    }
                    RangeBound::SpaceSeparatedList(tokens) => {
                        let _ = write!(buffer, " {}", tokens.join(" "));
                    }
                    RangeBound::Unconstrained => {}
                }
                match &range.default {
                    Some(default) => {
                        let _ = write!(buffer, " ({})", default);
                    }
                    None => buffer.push_str(" -no default-"),
                }
                buffer.push('\n');
            }
        }
        buffer
    }

    /// DIT table as text, with the magnitude corrections of the other configurations.
    pub fn format_dit_table(&self) -> ObResult<String> {
        let table = self.instrument.dit_table();
        let reference = table.telescope(REFERENCE_TELESCOPE)?;

        let mut buffer = String::from("    Mode     |Spec |  Pol  |Tel |       K       | DIT(s)\n");
        buffer.push_str("--------------------------------------------------------\n");
        for spec in DIT_TABLE_SPECS {
            for pol in DIT_TABLE_POLS {
                let Some(buckets) = reference.modes.get(spec).and_then(|p| p.get(pol)) else {
                    continue;
                };
                for (i, dit) in buckets.dits.iter().enumerate() {
                    let _ = writeln!(
                        buffer,
                        "Single Field | {:>4} | {:>3} | {:>2} | {:4.1} <=K< {:3.1} | {:4.1}",
                        spec,
                        pol,
                        REFERENCE_TELESCOPE,
                        buckets.mags[i],
                        buckets.mags[i + 1],
                        dit
                    );
                }
            }
        }
        let _ = writeln!(
            buffer,
            " Dual Field  |  all | all | AT | K - {:.1}       |  -",
            reference.kdf
        );
        let _ = writeln!(
            buffer,
            "Single Field |  all | all | UT | K - {:.1}       |  -",
            reference.kut
        );
        let _ = writeln!(
            buffer,
            " Dual Field  |  all | all | UT | K - {:.1}       |  -",
            reference.kut + reference.kdf
        );
        Ok(buffer)
    }

    /// Instrument help: both tables.
    pub fn help(&self) -> ObResult<String> {
        Ok(format!(
            "{}\n\n GravityRangeTable: \n{}\n\nGravityDitTable:\n{}",
            INSTRUMENT_NAME,
            self.format_range_table(),
            self.format_dit_table()?
        ))
    }
}

fn dual_field(ft: &Target, telescope: Telescope, sc_ra: &str, sc_dec: &str) -> ObResult<DualField> {
    let (ft_ra, ft_dec) = get_coords(ft, true)?;
    let ft_mag = get_flux(ft, Band::K)?;
    let offset = sky_diff(sc_ra, sc_dec, &ft_ra, &ft_dec)?;
    check_dual_field_distance(telescope, offset[0])?;
    Ok(DualField {
        ft_name: ft.name.clone(),
        ft_mag,
        ft_diameter: 0.0,
        ft_vis: 1.0,
        offset,
    })
}
