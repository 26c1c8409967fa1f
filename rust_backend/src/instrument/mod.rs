//! VLTI instruments and the GRAVITY OB generator.
//!
//! [`VltiInstrument`] owns the lookup tables of one instrument, loaded once from the
//! configuration directory. [`gravity::Gravity`] builds on it to turn an observation block
//! exported by the planning tool into P2 templates.

pub mod coords;
pub mod gravity;
pub mod submission;
pub mod timing;


pub use gravity::{Gravity, ObReport, PreparedOb};
pub use timing::ExposureTiming;

use std::path::Path;
use std::sync::Arc;

use crate::error::ObResult;
use crate::models::{ParamValue, Telescope};
use crate::p2::{ObDocument, ObId, VerifyResponse};
use crate::tables::{self, DitTable, RangeBound, RangeTable};
use crate::ui::Ui;

/// An instrument with its range and DIT tables.
#[derive(Debug, Clone)]
pub struct VltiInstrument {
    name: String,
    range_table: Arc<RangeTable>,
    dit_table: DitTable,
}

impl VltiInstrument {
    /// Read `<name>_rangeTable.json` and `<name>_ditTable.json` from `conf_dir`.
    pub fn load<P: AsRef<Path>>(name: &str, conf_dir: P) -> ObResult<Self> {
        let conf_dir = conf_dir.as_ref();
        let range_table = RangeTable::from_file(tables::range_table_path(conf_dir, name))?;
        let dit_table = DitTable::from_file(tables::dit_table_path(conf_dir, name))?;
        log::info!(
            "Loaded {} tables from {} ({} template entries)",
            name,
            conf_dir.display(),
            range_table.templates().len()
        );
        Ok(Self {
            name: name.to_string(),
            range_table: Arc::new(range_table),
            dit_table,
        })
    }

    /// Build an instrument from tables already in memory.
    pub fn from_tables(name: &str, range_table: RangeTable, dit_table: DitTable) -> Self {
        Self {
            name: name.to_string(),
            range_table: Arc::new(range_table),
            dit_table,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range_table(&self) -> &Arc<RangeTable> {
        &self.range_table
    }

    pub fn dit_table(&self) -> &DitTable {
        &self.dit_table
    }

    pub fn is_in_range(&self, template: &str, keyword: &str, value: &ParamValue) -> ObResult<bool> {
        self.range_table.is_in_range(template, keyword, value)
    }

    pub fn get_range(&self, template: &str, keyword: &str) -> ObResult<&RangeBound> {
        self.range_table.get_range(template, keyword)
    }

    pub fn get_range_defaults(&self, template: &str) -> ObResult<Vec<(String, ParamValue)>> {
        self.range_table.get_range_defaults(template)
    }

    pub fn get_dit(
        &self,
        tel: Telescope,
        spec: &str,
        pol: &str,
        k: f64,
        dual_feed: bool,
        show_warning: bool,
    ) -> ObResult<f64> {
        self.dit_table
            .get_dit(tel, spec, pol, k, dual_feed, show_warning)
    }

    /// Report the outcome of `verifyOB` to the user.
    pub fn show_p2_response(
        &self,
        ui: &mut dyn Ui,
        response: &VerifyResponse,
        ob: &ObDocument,
        ob_id: ObId,
    ) {
        ui.add_to_log("\n", true);
        if response.observable {
            ui.show_info_message(&format!(
                "OB {} submitted successfully on P2\n{} is OK.",
                ob_id.value(),
                ob.name
            ));
        } else {
            ui.show_warning_message(&format!(
                "OB {} submitted successfully on P2\n{} has WARNING.\n see LOG for details.",
                ob_id.value(),
                ob.name
            ));
        }
        ui.add_to_log(&format!("{}\n\n", response.messages.join("\n")), true);
    }
}
