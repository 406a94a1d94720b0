//! Raw Table Schema
//! The fixed positional column layout of the source CSV files.

/// Column names imposed on the raw CSVs. The files carry no header row and
/// always have exactly this many columns; any other width is malformed.
pub const RAW_COLUMNS: [&str; 64] = [
    "p1",
    "p36",
    "p37",
    "p2a",
    "weekday(p2a)",
    "p2b",
    "p6",
    "p7",
    "p8",
    "p9",
    "p10",
    "p11",
    "p12",
    "p13a",
    "p13b",
    "p13c",
    "p14",
    "p15",
    "p16",
    "p17",
    "p18",
    "p19",
    "p20",
    "p21",
    "p22",
    "p23",
    "p24",
    "p27",
    "p28",
    "p34",
    "p35",
    "p39",
    "p44",
    "p45a",
    "p47",
    "p48a",
    "p49",
    "p50a",
    "p50b",
    "p51",
    "p52",
    "p53",
    "p55a",
    "p57",
    "p58",
    "a",
    "b",
    "d",
    "e",
    "f",
    "g",
    "h",
    "i",
    "j",
    "k",
    "l",
    "n",
    "o",
    "p",
    "q",
    "r",
    "s",
    "t",
    "p5a",
];

/// Columns with a small fixed unordered value set.
pub const CATEGORICAL_COLUMNS: [&str; 5] = ["k", "l", "o", "p", "q"];

/// Free-text columns, never coerced to numeric.
pub const TEXT_COLUMNS: [&str; 2] = ["h", "i"];

/// Unique record identifier.
pub const ID_COLUMN: &str = "p1";

/// Raw name of the accident date column.
pub const RAW_DATE_COLUMN: &str = "p2a";

/// Semantic name of the accident date column after normalization.
pub const DATE_COLUMN: &str = "date";

/// Region tag column added by the loader.
pub const REGION_COLUMN: &str = "region";

/// Inner archive entry that holds a different dataset and must be skipped.
pub const EXCLUDED_FILE: &str = "CHODCI.csv";
