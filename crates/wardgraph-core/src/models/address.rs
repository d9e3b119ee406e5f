//! Postal addresses.

use serde::{Deserialize, Serialize};

use super::{or_unknown, require_text};
use crate::error::Result;
use crate::ids::{AddressId, PersonId};

/// A postal address. Every person owns exactly one; addresses registered
/// directly stay unattached until linked via `Hospital::set_address`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
    id: AddressId,
    country: String,
    city: String,
    street: String,
    state: String,
    postcode: String,
    building: String,
    apartment: String,
    pub(crate) person: Option<PersonId>,
}

/// Input for `Hospital::register_address`.
#[derive(Debug, Clone, Default)]
pub struct NewAddress {
    pub country: String,
    pub city: String,
    pub street: String,
    pub state: String,
    pub postcode: String,
    pub building: String,
    pub apartment: String,
}

impl NewAddress {
    pub(crate) fn validate(&self) -> Result<()> {
        require_text("country", &self.country)?;
        require_text("city", &self.city)?;
        require_text("street", &self.street)?;
        Ok(())
    }
}

impl Address {
    /// The mandatory-address default attached to every freshly registered
    /// person.
    pub(crate) fn placeholder(id: AddressId) -> Self {
        Self {
            id,
            country: "Unknown".to_string(),
            city: "Unknown".to_string(),
            street: "Unknown".to_string(),
            state: "Unknown".to_string(),
            postcode: "Unknown".to_string(),
            building: String::new(),
            apartment: String::new(),
            person: None,
        }
    }

    /// Build from pre-validated input. `state` and `postcode` fall back to
    /// the "Unknown" placeholder when blank.
    pub(crate) fn from_new(id: AddressId, new: NewAddress) -> Self {
        Self {
            id,
            country: new.country,
            city: new.city,
            street: new.street,
            state: or_unknown(new.state),
            postcode: or_unknown(new.postcode),
            building: new.building,
            apartment: new.apartment,
            person: None,
        }
    }

    pub fn id(&self) -> AddressId {
        self.id
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    pub fn building(&self) -> &str {
        &self.building
    }

    pub fn apartment(&self) -> &str {
        &self.apartment
    }

    /// The person currently holding this address, if any.
    pub fn person(&self) -> Option<PersonId> {
        self.person
    }

    pub fn set_country(&mut self, value: &str) -> Result<()> {
        require_text("country", value)?;
        self.country = value.to_string();
        Ok(())
    }

    pub fn set_city(&mut self, value: &str) -> Result<()> {
        require_text("city", value)?;
        self.city = value.to_string();
        Ok(())
    }

    pub fn set_street(&mut self, value: &str) -> Result<()> {
        require_text("street", value)?;
        self.street = value.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::Id;

    #[test]
    fn placeholder_is_unattached_and_unknown() {
        let address = Address::placeholder(Id::from_raw(0));
        assert_eq!(address.country(), "Unknown");
        assert!(address.person().is_none());
    }

    #[test]
    fn new_address_requires_core_fields() {
        let new = NewAddress {
            country: "PL".into(),
            city: " ".into(),
            street: "Main".into(),
            ..NewAddress::default()
        };
        assert!(new.validate().is_err());
    }

    #[test]
    fn blank_state_falls_back_to_unknown() {
        let new = NewAddress {
            country: "PL".into(),
            city: "Warsaw".into(),
            street: "Main".into(),
            ..NewAddress::default()
        };
        new.validate().unwrap();
        let address = Address::from_new(Id::from_raw(1), new);
        assert_eq!(address.state(), "Unknown");
        assert_eq!(address.building(), "");
    }
}
