//! Alumni record model and the validation applied to incoming profile data.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

static BATCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(20\d{2})-(\d{2})$").expect("valid batch regex"));

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?linkedin\.com/in/[\w-]+/?$").expect("valid linkedin regex")
});

/// Exclusive bounds for years of industry experience.
const EXPERIENCE_MIN_EXCLUSIVE: f64 = -1.0;
const EXPERIENCE_MAX_EXCLUSIVE: f64 = 50.0;

/// Gender of an alumnus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            _ => Err(AppError::Validation(
                "Gender must be Male, Female, or Other".to_string(),
            )),
        }
    }
}

/// A two-year academic cohort label such as `2008-10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Batch(String);

impl Batch {
    /// Parse and validate a batch label.
    ///
    /// The label must look like `20YY-YY` and span exactly two years, with the
    /// century of the end year taken from the start year.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let caps = BATCH_RE.captures(raw).ok_or_else(|| {
            AppError::Validation("Batch must be in format YYYY-YY (e.g., 2008-10)".to_string())
        })?;

        // Both groups are pure digits, bounded by the regex.
        let start_year: u32 = caps[1].parse().unwrap_or_default();
        let end_short: u32 = caps[2].parse().unwrap_or_default();
        let end_year = end_short + (start_year / 100) * 100;

        if end_year != start_year + 2 {
            return Err(AppError::Validation(
                "Batch must represent consecutive years (e.g., 2008-10)".to_string(),
            ));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored alumni record.
///
/// Field names match the persisted document so that existing data files load as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alumni {
    pub id: String,
    pub batch: String,
    #[serde(flatten)]
    pub profile: AlumniProfile,
}

impl Alumni {
    pub fn new(id: String, batch: &Batch, profile: AlumniProfile) -> Self {
        Self {
            id,
            batch: batch.as_str().to_string(),
            profile,
        }
    }

    /// Years of experience used for ordering; absent counts as zero.
    pub fn experience_or_zero(&self) -> f64 {
        self.profile.industry_experiences.unwrap_or(0.0)
    }
}

/// Everything about an alumnus except the identifier and the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlumniProfile {
    pub firstname: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub gender: Gender,
    pub linkedin_url: String,
    #[serde(default)]
    pub current_organization: Option<String>,
    #[serde(default)]
    pub current_position: Option<String>,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default, rename = "Industry_experiences")]
    pub industry_experiences: Option<f64>,
    #[serde(default)]
    pub software_skill_1: Option<String>,
    #[serde(default)]
    pub software_skill_2: Option<String>,
    #[serde(default)]
    pub software_skill_3: Option<String>,
    #[serde(default)]
    pub programming_lang_1: Option<String>,
    #[serde(default)]
    pub programming_lang_2: Option<String>,
    #[serde(default)]
    pub programming_lang_3: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

/// Request body for creating or updating an alumni record.
///
/// Everything is optional at the wire level so that missing fields surface as
/// validation errors rather than deserialization rejections. Any `id` sent by
/// the client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlumniInput {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub current_organization: Option<String>,
    #[serde(default)]
    pub current_position: Option<String>,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default, rename = "Industry_experiences", alias = "industry_experiences")]
    pub industry_experiences: Option<f64>,
    #[serde(default)]
    pub software_skill_1: Option<String>,
    #[serde(default)]
    pub software_skill_2: Option<String>,
    #[serde(default)]
    pub software_skill_3: Option<String>,
    #[serde(default)]
    pub programming_lang_1: Option<String>,
    #[serde(default)]
    pub programming_lang_2: Option<String>,
    #[serde(default)]
    pub programming_lang_3: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

impl AlumniInput {
    /// The batch label supplied by the caller, validated. Required on create.
    pub fn batch(&self) -> Result<Batch, AppError> {
        match self.batch.as_deref() {
            Some(raw) => Batch::parse(raw),
            None => Err(AppError::Validation("Batch is required".to_string())),
        }
    }

    /// Validate and normalise everything except the identifier and batch.
    pub fn into_profile(self) -> Result<AlumniProfile, AppError> {
        let firstname = match self.firstname.as_deref() {
            Some(name) if !name.is_empty() => capitalize(name),
            _ => return Err(AppError::Validation("First name is required".to_string())),
        };
        let surname = self.surname.as_deref().map(capitalize);

        let gender = self
            .gender
            .as_deref()
            .ok_or_else(|| AppError::Validation("Gender is required".to_string()))?
            .parse::<Gender>()?;

        let linkedin_url = self
            .linkedin_url
            .ok_or_else(|| AppError::Validation("LinkedIn URL is required".to_string()))?;
        if !LINKEDIN_RE.is_match(&linkedin_url) {
            return Err(AppError::Validation(
                "Invalid LinkedIn URL. Must be a valid LinkedIn profile URL \
                 (e.g., https://www.linkedin.com/in/username)"
                    .to_string(),
            ));
        }

        if let Some(years) = self.industry_experiences {
            if !(years > EXPERIENCE_MIN_EXCLUSIVE && years < EXPERIENCE_MAX_EXCLUSIVE) {
                return Err(AppError::Validation(format!(
                    "Industry experience must be greater than {} and less than {}",
                    EXPERIENCE_MIN_EXCLUSIVE, EXPERIENCE_MAX_EXCLUSIVE
                )));
            }
        }

        Ok(AlumniProfile {
            firstname,
            surname,
            gender,
            linkedin_url,
            current_organization: self.current_organization,
            current_position: self.current_position,
            current_location: self.current_location,
            industry_experiences: self.industry_experiences,
            software_skill_1: self.software_skill_1,
            software_skill_2: self.software_skill_2,
            software_skill_3: self.software_skill_3,
            programming_lang_1: self.programming_lang_1,
            programming_lang_2: self.programming_lang_2,
            programming_lang_3: self.programming_lang_3,
            profile_photo: self.profile_photo,
        })
    }
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
