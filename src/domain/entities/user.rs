use crate::domain::value_objects::coords::Coordinates;
use chrono::{Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const COUNTRIES: [&str; 2] = ["canada", "united_states"];

pub const REGIONS: [&str; 63] = [
    "alberta",
    "british_columbia",
    "manitoba",
    "new_brunswick",
    "newfoundland_and_labrador",
    "northwest_territories",
    "nova_scotia",
    "nunavut",
    "ontario",
    "prince_edward_island",
    "quebec",
    "saskatchewan",
    "yukon",
    "alabama",
    "alaska",
    "arizona",
    "arkansas",
    "california",
    "colorado",
    "connecticut",
    "delaware",
    "florida",
    "georgia",
    "hawaii",
    "idaho",
    "illinois",
    "indiana",
    "iowa",
    "kansas",
    "kentucky",
    "louisiana",
    "maine",
    "maryland",
    "massachusetts",
    "michigan",
    "minnesota",
    "mississippi",
    "missouri",
    "montana",
    "nebraska",
    "nevada",
    "new_hampshire",
    "new_jersey",
    "new_mexico",
    "new_york",
    "north_carolina",
    "north_dakota",
    "ohio",
    "oklahoma",
    "oregon",
    "pennsylvania",
    "rhode_island",
    "south_carolina",
    "south_dakota",
    "tennessee",
    "texas",
    "utah",
    "vermont",
    "virginia",
    "washington",
    "west_virginia",
    "wisconsin",
    "wyoming",
];

const MINIMUM_AGE_YEARS: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserGender {
    Male,
    Female,
    #[serde(rename = "non-binary")]
    NonBinary,
    #[serde(rename = "")]
    #[default]
    Unset,
}

impl UserGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserGender::Male => "male",
            UserGender::Female => "female",
            UserGender::NonBinary => "non-binary",
            UserGender::Unset => "",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "male" => UserGender::Male,
            "female" => UserGender::Female,
            "non-binary" => UserGender::NonBinary,
            _ => UserGender::Unset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub gender: UserGender,
    pub birth_day: String,
    pub birth_month: String,
    pub birth_year: String,
    pub country: String,
    pub region: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "long")]
    pub longitude: f64,
    pub push_token: Option<String>,
}

/// Profile fields a caller supplies on signup or update; the id is issued
/// externally and never part of the draft.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub gender: UserGender,
    pub birth_day: String,
    pub birth_month: String,
    pub birth_year: String,
    pub country: String,
    pub region: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "long")]
    pub longitude: f64,
    pub push_token: Option<String>,
}

impl User {
    pub fn new(user_id: impl Into<String>, draft: UserDraft) -> Self {
        Self {
            user_id: user_id.into(),
            name: draft.name,
            email: draft.email,
            gender: draft.gender,
            birth_day: draft.birth_day,
            birth_month: draft.birth_month,
            birth_year: draft.birth_year,
            country: draft.country,
            region: draft.region,
            latitude: draft.latitude,
            longitude: draft.longitude,
            push_token: draft.push_token,
        }
    }

    pub fn apply_draft(&mut self, draft: UserDraft) {
        self.name = draft.name;
        self.email = draft.email;
        self.gender = draft.gender;
        self.birth_day = draft.birth_day;
        self.birth_month = draft.birth_month;
        self.birth_year = draft.birth_year;
        self.country = draft.country;
        self.region = draft.region;
        self.latitude = draft.latitude;
        self.longitude = draft.longitude;
        self.push_token = draft.push_token;
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        let year: i32 = self.birth_year.parse().ok()?;
        let month: u32 = self.birth_month.parse().ok()?;
        let day: u32 = self.birth_day.parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Signup/update validity: every field except region and the push token
    /// is required, the email is shaped like an address, the location is in
    /// range, and the user is at least thirteen years old.
    pub fn is_valid(&self) -> bool {
        if self.name.is_empty()
            || self.email.is_empty()
            || self.gender == UserGender::Unset
            || self.birth_day.is_empty()
            || self.birth_month.is_empty()
            || self.birth_year.is_empty()
            || self.country.is_empty()
        {
            return false;
        }
        if !COUNTRIES.contains(&self.country.as_str()) {
            return false;
        }
        if !self.region.is_empty() && !REGIONS.contains(&self.region.as_str()) {
            return false;
        }
        if !self.coordinates().is_valid() {
            return false;
        }
        if !is_plausible_email(&self.email) {
            return false;
        }
        let Some(birth) = self.birth_date() else {
            return false;
        };
        let Some(cutoff) = birth.checked_add_months(Months::new(MINIMUM_AGE_YEARS * 12)) else {
            return false;
        };
        cutoff <= Utc::now().date_naive()
    }
}

fn is_plausible_email(email: &str) -> bool {
    let email = email.to_lowercase();
    let Some((local, rest)) = email.split_once('@') else {
        return false;
    };
    let Some((domain, tld)) = rest.rsplit_once('.') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    let domain_ok = !domain.is_empty()
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'));
    let tld_ok = !tld.is_empty() && tld.chars().all(|c| c.is_ascii_alphanumeric());
    local_ok && domain_ok && tld_ok
}
