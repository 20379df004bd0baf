// Column names of the summary tables produced by the upstream replay
pub const AVG_CURRENT: &str = "avg_current";
pub const CHARGE: &str = "charge";
pub const REAL_YIELD: &str = "real_Yield";
pub const REAL_YIELD_ERR: &str = "real_Yield_err";
pub const HMS_TRK_EFF: &str = "hTrkEff";
pub const HMS_TRK_EFF_ERR: &str = "hTrkEff_err";
pub const SHMS_TRK_EFF: &str = "pTrkEff";
pub const SHMS_TRK_EFF_ERR: &str = "pTrkEff_err";
pub const TOTAL_LIVE_TIME: &str = "tLT";
pub const TOTAL_LIVE_TIME_ERR: &str = "tLT_err_Bi";
pub const MULTI_TRACK_EFF: &str = "multi_track_eff";
pub const T2_SCALER_RATE: &str = "T2_scl_rate";
pub const BEAM_TIME: &str = "beam_time";

/// Every column the normalization needs, in the order they are validated
pub const REQUIRED_COLUMNS: [&str; 13] = [
    AVG_CURRENT,
    CHARGE,
    REAL_YIELD,
    REAL_YIELD_ERR,
    HMS_TRK_EFF,
    HMS_TRK_EFF_ERR,
    SHMS_TRK_EFF,
    SHMS_TRK_EFF_ERR,
    TOTAL_LIVE_TIME,
    TOTAL_LIVE_TIME_ERR,
    MULTI_TRACK_EFF,
    T2_SCALER_RATE,
    BEAM_TIME,
];

pub const COMMENT_MARKER: u8 = b'#';
pub const KHZ_TO_HZ: f64 = 1000.0;
