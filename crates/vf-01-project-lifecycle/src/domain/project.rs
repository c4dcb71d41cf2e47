//! Registration and edit inputs, with their field-level validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{GeoTag, Location, Project, ProjectImage, ProjectStatus, UserId};

/// Crop type recorded when the registrant leaves it blank.
pub const DEFAULT_CROP_TYPE: &str = "other";

/// Fields a farmer supplies when registering a parcel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub area_hectares: Option<f64>,
    #[serde(default)]
    pub crop_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_credits: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl NewProject {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        validate_area(self.area_hectares)?;
        validate_dates(self.start_date, self.end_date)?;
        if let Some(credits) = self.estimated_credits {
            if !credits.is_finite() || credits < 0.0 {
                return Err("estimated credits must be a non-negative number".to_string());
            }
        }
        Ok(())
    }
}

/// Partial content edit. Absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub area_hectares: Option<f64>,
    #[serde(default)]
    pub crop_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl ContentUpdate {
    /// Apply onto a copy of `project`, validating the merged result.
    pub fn apply_to(&self, project: &Project) -> Result<Project, String> {
        let mut updated = project.clone();
        if let Some(title) = &self.title {
            validate_title(title)?;
            updated.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            updated.description = Some(description.clone());
        }
        if let Some(location) = &self.location {
            updated.location = Some(location.clone());
        }
        if self.area_hectares.is_some() {
            validate_area(self.area_hectares)?;
            updated.area_hectares = self.area_hectares;
        }
        if let Some(crop) = &self.crop_type {
            updated.crop_type = crop_or_default(Some(crop));
        }
        if self.start_date.is_some() {
            updated.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            updated.end_date = self.end_date;
        }
        if let Some(notes) = &self.notes {
            updated.notes = notes.clone();
        }
        if self.metadata.is_some() {
            updated.metadata = self.metadata.clone();
        }
        validate_dates(updated.start_date, updated.end_date)?;
        Ok(updated)
    }
}

/// Listing filter. Empty `statuses` matches every status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub owner: Option<UserId>,
    pub statuses: Vec<ProjectStatus>,
}

impl ProjectFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn owned_by(owner: UserId) -> Self {
        Self {
            owner: Some(owner),
            statuses: Vec::new(),
        }
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = ProjectStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn matches(&self, project: &Project) -> bool {
        let owner_ok = self
            .owner
            .as_ref()
            .map_or(true, |owner| project.is_owned_by(owner));
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&project.status);
        owner_ok && status_ok
    }
}

pub(crate) fn crop_or_default(crop: Option<&String>) -> String {
    match crop.map(|c| c.trim()) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CROP_TYPE.to_string(),
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title is required".to_string());
    }
    Ok(())
}

fn validate_area(area: Option<f64>) -> Result<(), String> {
    match area {
        Some(a) if !a.is_finite() || a < 0.0 => {
            Err(format!("area must be a non-negative number of hectares, got {a}"))
        }
        _ => Ok(()),
    }
}

fn validate_dates(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<(), String> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err("end date must not be before start date".to_string());
        }
    }
    Ok(())
}

pub(crate) fn validate_image(image: &ProjectImage) -> Result<(), String> {
    if image.url.trim().is_empty() {
        return Err("image url is required".to_string());
    }
    if let Some(GeoTag {
        latitude,
        longitude,
    }) = image.geotag
    {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude {latitude} is outside [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude {longitude} is outside [-180, 180]"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_title_required() {
        assert!(NewProject::titled("  ").validate().is_err());
        assert!(NewProject::titled("Mango orchard").validate().is_ok());
    }

    #[test]
    fn test_negative_area_rejected() {
        let mut p = NewProject::titled("Plot");
        p.area_hectares = Some(-1.0);
        assert!(p.validate().is_err());
        p.area_hectares = Some(0.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut p = NewProject::titled("Plot");
        p.start_date = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        p.end_date = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_blank_crop_defaults() {
        assert_eq!(crop_or_default(None), "other");
        assert_eq!(crop_or_default(Some(&" ".to_string())), "other");
        assert_eq!(crop_or_default(Some(&"rice".to_string())), "rice");
    }

    #[test]
    fn test_geotag_bounds() {
        let mut image = ProjectImage::new("https://img/1.jpg");
        image.geotag = Some(GeoTag {
            latitude: 91.0,
            longitude: 0.0,
        });
        assert!(validate_image(&image).is_err());
        image.geotag = Some(GeoTag {
            latitude: 12.97,
            longitude: 77.59,
        });
        assert!(validate_image(&image).is_ok());
    }

    #[test]
    fn test_filter_matches_owner_and_status() {
        let filter = ProjectFilter::owned_by(UserId::new("u1"))
            .with_statuses([ProjectStatus::Draft, ProjectStatus::Submitted]);
        assert_eq!(filter.statuses.len(), 2);
        assert!(ProjectFilter::all().statuses.is_empty());
    }
}
