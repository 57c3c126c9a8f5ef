use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// US tile-grid layout
// ---------------------------------------------------------------------------

/// A state's square on the tile map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTile {
    /// Postal code, matching the `US_State` column.
    pub code: &'static str,
    pub name: &'static str,
    pub col: u8,
    pub row: u8,
}

pub const GRID_COLS: u8 = 12;
pub const GRID_ROWS: u8 = 8;

const fn tile(code: &'static str, name: &'static str, col: u8, row: u8) -> StateTile {
    StateTile { code, name, col, row }
}

/// The 50 states plus DC laid out roughly geographically.
pub const STATE_TILES: &[StateTile] = &[
    tile("AK", "Alaska", 0, 0),
    tile("ME", "Maine", 11, 0),
    tile("VT", "Vermont", 10, 1),
    tile("NH", "New Hampshire", 11, 1),
    tile("WA", "Washington", 1, 2),
    tile("ID", "Idaho", 2, 2),
    tile("MT", "Montana", 3, 2),
    tile("ND", "North Dakota", 4, 2),
    tile("MN", "Minnesota", 5, 2),
    tile("IL", "Illinois", 6, 2),
    tile("WI", "Wisconsin", 7, 2),
    tile("MI", "Michigan", 8, 2),
    tile("NY", "New York", 9, 2),
    tile("RI", "Rhode Island", 10, 2),
    tile("MA", "Massachusetts", 11, 2),
    tile("OR", "Oregon", 1, 3),
    tile("NV", "Nevada", 2, 3),
    tile("WY", "Wyoming", 3, 3),
    tile("SD", "South Dakota", 4, 3),
    tile("IA", "Iowa", 5, 3),
    tile("IN", "Indiana", 6, 3),
    tile("OH", "Ohio", 7, 3),
    tile("PA", "Pennsylvania", 8, 3),
    tile("NJ", "New Jersey", 9, 3),
    tile("CT", "Connecticut", 10, 3),
    tile("CA", "California", 1, 4),
    tile("UT", "Utah", 2, 4),
    tile("CO", "Colorado", 3, 4),
    tile("NE", "Nebraska", 4, 4),
    tile("MO", "Missouri", 5, 4),
    tile("KY", "Kentucky", 6, 4),
    tile("WV", "West Virginia", 7, 4),
    tile("VA", "Virginia", 8, 4),
    tile("MD", "Maryland", 9, 4),
    tile("DE", "Delaware", 10, 4),
    tile("AZ", "Arizona", 2, 5),
    tile("NM", "New Mexico", 3, 5),
    tile("KS", "Kansas", 4, 5),
    tile("AR", "Arkansas", 5, 5),
    tile("TN", "Tennessee", 6, 5),
    tile("NC", "North Carolina", 7, 5),
    tile("SC", "South Carolina", 8, 5),
    tile("DC", "District of Columbia", 9, 5),
    tile("OK", "Oklahoma", 4, 6),
    tile("LA", "Louisiana", 5, 6),
    tile("MS", "Mississippi", 6, 6),
    tile("AL", "Alabama", 7, 6),
    tile("GA", "Georgia", 8, 6),
    tile("HI", "Hawaii", 0, 7),
    tile("TX", "Texas", 4, 7),
    tile("FL", "Florida", 9, 7),
];

pub fn tile_for(code: &str) -> Option<&'static StateTile> {
    STATE_TILES.iter().find(|t| t.code == code)
}

pub fn tile_at(col: u8, row: u8) -> Option<&'static StateTile> {
    STATE_TILES.iter().find(|t| t.col == col && t.row == row)
}

/// Codes that have no tile and therefore never show on the map.
pub fn unmapped<'a>(codes: impl IntoIterator<Item = &'a str>) -> BTreeSet<&'a str> {
    codes
        .into_iter()
        .filter(|code| tile_for(code).is_none())
        .collect()
}
