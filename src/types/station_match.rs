use serde::{Deserialize, Serialize};

/// How a record's station name (`nom`) is compared with the requested station.
///
/// Both modes ignore case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationMatch {
    /// The names must be equal. The catalog query is also refined on `nom`.
    Exact,
    /// The requested name must occur somewhere in the record's name.
    #[default]
    Substring,
}

impl StationMatch {
    pub fn matches(&self, requested: &str, record_station: &str) -> bool {
        let requested = requested.trim().to_lowercase();
        let record_station = record_station.trim().to_lowercase();
        match self {
            StationMatch::Exact => record_station == requested,
            StationMatch::Substring => record_station.contains(&requested),
        }
    }

    /// Catalog `where` predicate selecting `station` on `nom`.
    ///
    /// Catalog names are upper case, so the substring pattern is upper-cased.
    pub fn where_predicate(&self, station: &str) -> String {
        let station = station.trim();
        match self {
            StationMatch::Exact => format!("nom = \"{}\"", escape_literal(station)),
            StationMatch::Substring => {
                format!("nom like \"%{}%\"", escape_literal(&station.to_uppercase()))
            }
        }
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
