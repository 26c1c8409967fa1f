//! Template keywords used by the GRAVITY OB generator.
//!
//! Keywords are stored with dots (`INS.SPEC.RES`); the underscore form (`INS_SPEC_RES`)
//! is accepted by the attribute-style accessors and converted with [`keyword_from_attr`].

pub const SEQ_FI_HMAG: &str = "SEQ.FI.HMAG";
pub const SEQ_INS_SOBJ_NAME: &str = "SEQ.INS.SOBJ.NAME";
pub const SEQ_INS_SOBJ_MAG: &str = "SEQ.INS.SOBJ.MAG";
pub const SEQ_INS_SOBJ_DIAMETER: &str = "SEQ.INS.SOBJ.DIAMETER";
pub const SEQ_INS_SOBJ_VIS: &str = "SEQ.INS.SOBJ.VIS";
pub const SEQ_INS_SOBJ_X: &str = "SEQ.INS.SOBJ.X";
pub const SEQ_INS_SOBJ_Y: &str = "SEQ.INS.SOBJ.Y";
pub const SEQ_FT_ROBJ_NAME: &str = "SEQ.FT.ROBJ.NAME";
pub const SEQ_FT_ROBJ_MAG: &str = "SEQ.FT.ROBJ.MAG";
pub const SEQ_FT_ROBJ_DIAMETER: &str = "SEQ.FT.ROBJ.DIAMETER";
pub const SEQ_FT_ROBJ_VIS: &str = "SEQ.FT.ROBJ.VIS";
pub const SEQ_FT_MODE: &str = "SEQ.FT.MODE";
pub const INS_SPEC_RES: &str = "INS.SPEC.RES";
pub const INS_FT_POL: &str = "INS.FT.POL";
pub const INS_SPEC_POL: &str = "INS.SPEC.POL";
pub const COU_AG_GSSOURCE: &str = "COU.AG.GSSOURCE";
pub const COU_AG_ALPHA: &str = "COU.AG.ALPHA";
pub const COU_AG_DELTA: &str = "COU.AG.DELTA";
pub const COU_AG_PMA: &str = "COU.AG.PMA";
pub const COU_AG_PMD: &str = "COU.AG.PMD";
pub const COU_GS_MAG: &str = "COU.GS.MAG";
pub const TEL_TARG_PARALLAX: &str = "TEL.TARG.PARALLAX";

pub const DET2_DIT: &str = "DET2.DIT";
pub const DET2_NDIT_OBJECT: &str = "DET2.NDIT.OBJECT";
pub const DET2_NDIT_SKY: &str = "DET2.NDIT.SKY";
pub const SEQ_OBSSEQ: &str = "SEQ.OBSSEQ";
pub const SEQ_SKY_X: &str = "SEQ.SKY.X";
pub const SEQ_SKY_Y: &str = "SEQ.SKY.Y";
pub const SEQ_RELOFF_X: &str = "SEQ.RELOFF.X";
pub const SEQ_RELOFF_Y: &str = "SEQ.RELOFF.Y";

/// `INS_SPEC_RES` -> `INS.SPEC.RES`
pub fn keyword_from_attr(attr: &str) -> String {
    attr.replace('_', ".")
}
