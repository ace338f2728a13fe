use serde::{Deserialize, Serialize};

/// City and state printed in every dataset address. The dataset only covers Manhattan.
pub const CITY: &str = "Manhattan";
pub const STATE: &str = "NY";

/// One restaurant-inspection row from the backing dataset.
///
/// Rows carry no durable key: within a request a record is identified by its
/// position in the candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub cuisine: String,
    pub street: String,
    pub building: String,
    /// Normalized integer string, "0" when the source cell was missing.
    pub zipcode: String,
    pub phone: String,
    /// "Critical", "Not Critical", "Not Applicable" or empty.
    pub critical_flag: String,
}

impl Restaurant {
    /// `<building> <street>, Manhattan, NY <zip>`
    pub fn address(&self) -> String {
        format!(
            "{} {}, {}, {} {}",
            self.building, self.street, CITY, STATE, self.zipcode
        )
    }

    pub fn has_critical_violation(&self) -> bool {
        self.critical_flag
            .trim()
            .to_lowercase()
            .starts_with("critical")
    }
}
