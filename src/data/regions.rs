//! Administrative Regions
//! The 14 regions of the dataset and their two-digit file-name codes.

/// One of the 14 administrative regions covered by the dataset.
///
/// Inner CSV files are named by a two-digit numeric code; the region tag
/// stored in the table is the short letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    PHA,
    STC,
    JHC,
    PLK,
    ULK,
    HKK,
    JHM,
    MSK,
    OLK,
    ZLK,
    VYS,
    PAK,
    LBK,
    KVK,
}

impl Region {
    /// All regions, in dataset code order.
    pub const ALL: [Region; 14] = [
        Region::PHA,
        Region::STC,
        Region::JHC,
        Region::PLK,
        Region::ULK,
        Region::HKK,
        Region::JHM,
        Region::MSK,
        Region::OLK,
        Region::ZLK,
        Region::VYS,
        Region::PAK,
        Region::LBK,
        Region::KVK,
    ];

    /// Two-digit numeric code used as the inner CSV file-name prefix.
    pub fn code(self) -> &'static str {
        match self {
            Region::PHA => "00",
            Region::STC => "01",
            Region::JHC => "02",
            Region::PLK => "03",
            Region::ULK => "04",
            Region::HKK => "05",
            Region::JHM => "06",
            Region::MSK => "07",
            Region::OLK => "14",
            Region::ZLK => "15",
            Region::VYS => "16",
            Region::PAK => "17",
            Region::LBK => "18",
            Region::KVK => "19",
        }
    }

    /// Look up a region by its two-digit file-name code.
    pub fn from_code(code: &str) -> Option<Region> {
        Region::ALL.iter().copied().find(|r| r.code() == code)
    }

    /// Look up a region by its letter tag (the `region` column value).
    pub fn from_tag(tag: &str) -> Option<Region> {
        Region::ALL.iter().copied().find(|r| r.as_str() == tag)
    }

    /// Short letter tag stored in the `region` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Region::PHA => "PHA",
            Region::STC => "STC",
            Region::JHC => "JHC",
            Region::PLK => "PLK",
            Region::ULK => "ULK",
            Region::HKK => "HKK",
            Region::JHM => "JHM",
            Region::MSK => "MSK",
            Region::OLK => "OLK",
            Region::ZLK => "ZLK",
            Region::VYS => "VYS",
            Region::PAK => "PAK",
            Region::LBK => "LBK",
            Region::KVK => "KVK",
        }
    }
}
