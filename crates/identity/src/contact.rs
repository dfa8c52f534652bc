//! Personal and contact value objects.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use gatehouse_core::{DomainError, DomainResult, ValueObject, ensure_not_blank};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([-+.']\w+)*@\w+([-.]\w+)*\.\w+([-.]\w+)*$").expect("email pattern compiles")
});

static TELEPHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((\(\d{3}\))|(\d{3}-))\d{3}-\d{4}$").expect("telephone pattern compiles")
});

/// E-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(address: &str) -> DomainResult<Self> {
        ensure_not_blank(address, "email address")?;
        if !EMAIL_PATTERN.is_match(address) {
            return Err(DomainError::validation(format!("malformed email address: {address}")));
        }
        Ok(Self(address.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::new(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl ValueObject for EmailAddress {}

/// Telephone number, `(555)555-5555` or `555-555-5555`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Telephone(String);

impl Telephone {
    pub fn new(number: &str) -> DomainResult<Self> {
        ensure_not_blank(number, "telephone number")?;
        if !TELEPHONE_PATTERN.is_match(number) {
            return Err(DomainError::validation(format!("malformed telephone number: {number}")));
        }
        Ok(Self(number.to_string()))
    }

    /// Parse an optional number: blank input means "no number".
    pub fn optional(number: &str) -> DomainResult<Option<Self>> {
        if number.trim().is_empty() {
            return Ok(None);
        }
        Self::new(number).map(Some)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Telephone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Telephone {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::new(&value)
    }
}

impl From<Telephone> for String {
    fn from(value: Telephone) -> Self {
        value.0
    }
}

impl ValueObject for Telephone {}

/// Postal address. The building number is the only optional part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PostalAddressFields")]
pub struct PostalAddress {
    street_name: String,
    building_number: String,
    postal_code: String,
    town: String,
    state_province: String,
    country_code: String,
}

impl PostalAddress {
    pub fn new(
        street_name: &str,
        building_number: &str,
        postal_code: &str,
        town: &str,
        state_province: &str,
        country_code: &str,
    ) -> DomainResult<Self> {
        ensure_not_blank(street_name, "street name")?;
        ensure_not_blank(postal_code, "postal code")?;
        ensure_not_blank(town, "town")?;
        ensure_not_blank(state_province, "state/province")?;
        ensure_not_blank(country_code, "country code")?;
        Ok(Self {
            street_name: street_name.to_string(),
            building_number: building_number.to_string(),
            postal_code: postal_code.to_string(),
            town: town.to_string(),
            state_province: state_province.to_string(),
            country_code: country_code.to_string(),
        })
    }

    pub fn street_name(&self) -> &str {
        &self.street_name
    }

    pub fn building_number(&self) -> &str {
        &self.building_number
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn town(&self) -> &str {
        &self.town
    }

    pub fn state_province(&self) -> &str {
        &self.state_province
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }
}

/// Unchecked wire shape of [`PostalAddress`].
#[derive(Deserialize)]
struct PostalAddressFields {
    street_name: String,
    #[serde(default)]
    building_number: String,
    postal_code: String,
    town: String,
    state_province: String,
    country_code: String,
}

impl TryFrom<PostalAddressFields> for PostalAddress {
    type Error = DomainError;

    fn try_from(f: PostalAddressFields) -> DomainResult<Self> {
        Self::new(
            &f.street_name,
            &f.building_number,
            &f.postal_code,
            &f.town,
            &f.state_province,
            &f.country_code,
        )
    }
}

impl ValueObject for PostalAddress {}

/// First and last name of a person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FullNameFields")]
pub struct FullName {
    first_name: String,
    last_name: String,
}

impl FullName {
    pub fn new(first_name: &str, last_name: &str) -> DomainResult<Self> {
        ensure_not_blank(first_name, "first name")?;
        ensure_not_blank(last_name, "last name")?;
        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn formatted_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Deserialize)]
struct FullNameFields {
    first_name: String,
    last_name: String,
}

impl TryFrom<FullNameFields> for FullName {
    type Error = DomainError;

    fn try_from(f: FullNameFields) -> DomainResult<Self> {
        Self::new(&f.first_name, &f.last_name)
    }
}

impl ValueObject for FullName {}

/// How to reach a person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactInformation {
    postal_address: PostalAddress,
    email_address: EmailAddress,
    primary_telephone: Telephone,
    secondary_telephone: Option<Telephone>,
}

impl ContactInformation {
    pub fn new(
        postal_address: PostalAddress,
        email_address: EmailAddress,
        primary_telephone: Telephone,
        secondary_telephone: Option<Telephone>,
    ) -> Self {
        Self {
            postal_address,
            email_address,
            primary_telephone,
            secondary_telephone,
        }
    }

    pub fn postal_address(&self) -> &PostalAddress {
        &self.postal_address
    }

    pub fn email_address(&self) -> &EmailAddress {
        &self.email_address
    }

    pub fn primary_telephone(&self) -> &Telephone {
        &self.primary_telephone
    }

    pub fn secondary_telephone(&self) -> Option<&Telephone> {
        self.secondary_telephone.as_ref()
    }

    pub fn with_email_address(&self, email_address: EmailAddress) -> Self {
        Self {
            email_address,
            ..self.clone()
        }
    }

    pub fn with_postal_address(&self, postal_address: PostalAddress) -> Self {
        Self {
            postal_address,
            ..self.clone()
        }
    }

    pub fn with_primary_telephone(&self, primary_telephone: Telephone) -> Self {
        Self {
            primary_telephone,
            ..self.clone()
        }
    }

    pub fn with_secondary_telephone(&self, secondary_telephone: Option<Telephone>) -> Self {
        Self {
            secondary_telephone,
            ..self.clone()
        }
    }
}

impl ValueObject for ContactInformation {}

/// Personal data attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    name: FullName,
    contact_information: ContactInformation,
}

impl Person {
    pub fn new(name: FullName, contact_information: ContactInformation) -> Self {
        Self {
            name,
            contact_information,
        }
    }

    pub fn name(&self) -> &FullName {
        &self.name
    }

    pub fn contact_information(&self) -> &ContactInformation {
        &self.contact_information
    }

    pub fn email_address(&self) -> &EmailAddress {
        self.contact_information.email_address()
    }

    /// Returns whether the value actually changed.
    pub(crate) fn change_contact_information(&mut self, contact_information: ContactInformation) -> bool {
        if self.contact_information == contact_information {
            return false;
        }
        self.contact_information = contact_information;
        true
    }

    /// Returns whether the value actually changed.
    pub(crate) fn change_name(&mut self, name: FullName) -> bool {
        if self.name == name {
            return false;
        }
        self.name = name;
        true
    }
}
