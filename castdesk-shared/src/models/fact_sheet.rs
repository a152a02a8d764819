/// Fact sheet model and database operations
///
/// Every project has exactly one fact sheet, created in `pending` status
/// together with the project. The sheet collects the commercial terms of the
/// production and moves through an approval workflow:
///
/// - a `project` account may edit content fields while the sheet is `pending`
/// - an `admin` decides the status (`approved` stamps `approved_at` and
///   `approved_by_id`, or `rejected`)
///
/// Those rules are enforced by the route handlers; this module only persists.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// Approval workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fact_sheet_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FactSheetStatus {
    Pending,
    Approved,
    Rejected,
}

impl FactSheetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactSheetStatus::Pending => "pending",
            FactSheetStatus::Approved => "approved",
            FactSheetStatus::Rejected => "rejected",
        }
    }
}

/// Fact sheet record, keyed by its project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FactSheet {
    pub project_id: i32,
    pub client_id: i32,
    pub client_reference: Option<String>,
    pub casting_reference: Option<String>,
    pub project_name: Option<String>,
    pub director: Option<String>,
    pub deadline_date: Option<NaiveDate>,
    pub ppm_date: Option<NaiveDate>,
    pub project_description: Option<String>,
    pub shooting_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub total_hours: Option<f64>,
    pub time_range_start: Option<NaiveTime>,
    pub time_range_end: Option<NaiveTime>,
    pub budget_details: Option<String>,
    pub terms: Option<String>,
    pub total_project_price: Option<f64>,
    pub rights_buy_outs: Option<String>,
    pub conditions: Option<String>,
    pub status: FactSheetStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content fields a project account may edit while the sheet is pending
///
/// Only non-None fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFactSheetContent {
    pub client_reference: Option<Option<String>>,
    pub casting_reference: Option<Option<String>>,
    pub project_name: Option<Option<String>>,
    pub director: Option<Option<String>>,
    pub deadline_date: Option<Option<NaiveDate>>,
    pub ppm_date: Option<Option<NaiveDate>>,
    pub project_description: Option<Option<String>>,
    pub shooting_date: Option<Option<NaiveDate>>,
    pub location: Option<Option<String>>,
    pub total_hours: Option<Option<f64>>,
    pub time_range_start: Option<Option<NaiveTime>>,
    pub time_range_end: Option<Option<NaiveTime>>,
    pub budget_details: Option<Option<String>>,
    pub terms: Option<Option<String>>,
    pub total_project_price: Option<Option<f64>>,
    pub rights_buy_outs: Option<Option<String>>,
    pub conditions: Option<Option<String>>,
}

impl UpdateFactSheetContent {
    /// True when no content field is present
    pub fn is_empty(&self) -> bool {
        self.client_reference.is_none()
            && self.casting_reference.is_none()
            && self.project_name.is_none()
            && self.director.is_none()
            && self.deadline_date.is_none()
            && self.ppm_date.is_none()
            && self.project_description.is_none()
            && self.shooting_date.is_none()
            && self.location.is_none()
            && self.total_hours.is_none()
            && self.time_range_start.is_none()
            && self.time_range_end.is_none()
            && self.budget_details.is_none()
            && self.terms.is_none()
            && self.total_project_price.is_none()
            && self.rights_buy_outs.is_none()
            && self.conditions.is_none()
    }
}

const SHEET_COLUMNS: &str = "project_id, client_id, client_reference, casting_reference, \
                             project_name, director, deadline_date, ppm_date, \
                             project_description, shooting_date, location, total_hours, \
                             time_range_start, time_range_end, budget_details, terms, \
                             total_project_price, rights_buy_outs, conditions, status, \
                             approved_at, approved_by_id, created_at, updated_at";

impl FactSheet {
    /// Creates the pending fact sheet for a freshly created project
    ///
    /// Takes any executor; project creation runs this in the same
    /// transaction as the project insert so a project can never exist
    /// without its sheet.
    pub async fn create_for_project(
        executor: impl PgExecutor<'_>,
        project_id: i32,
        client_id: i32,
    ) -> Result<Self, sqlx::Error> {
        let sheet = sqlx::query_as::<_, FactSheet>(&format!(
            r#"
            INSERT INTO fact_sheets (project_id, client_id)
            VALUES ($1, $2)
            RETURNING {SHEET_COLUMNS}
            "#,
        ))
        .bind(project_id)
        .bind(client_id)
        .fetch_one(executor)
        .await?;

        Ok(sheet)
    }

    pub async fn find_by_project_id(pool: &PgPool, project_id: i32) -> Result<Option<Self>, sqlx::Error> {
        let sheet = sqlx::query_as::<_, FactSheet>(&format!(
            "SELECT {SHEET_COLUMNS} FROM fact_sheets WHERE project_id = $1",
        ))
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        Ok(sheet)
    }

    /// Applies a content edit; the handler has already checked the workflow
    /// rules (ownership and pending status)
    pub async fn update_content(
        pool: &PgPool,
        project_id: i32,
        data: UpdateFactSheetContent,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_project_id(pool, project_id).await;
        }

        let mut query = String::from("UPDATE fact_sheets SET updated_at = NOW()");
        let mut bind_count = 1;

        let fields: [(&str, bool); 17] = [
            ("client_reference", data.client_reference.is_some()),
            ("casting_reference", data.casting_reference.is_some()),
            ("project_name", data.project_name.is_some()),
            ("director", data.director.is_some()),
            ("deadline_date", data.deadline_date.is_some()),
            ("ppm_date", data.ppm_date.is_some()),
            ("project_description", data.project_description.is_some()),
            ("shooting_date", data.shooting_date.is_some()),
            ("location", data.location.is_some()),
            ("total_hours", data.total_hours.is_some()),
            ("time_range_start", data.time_range_start.is_some()),
            ("time_range_end", data.time_range_end.is_some()),
            ("budget_details", data.budget_details.is_some()),
            ("terms", data.terms.is_some()),
            ("total_project_price", data.total_project_price.is_some()),
            ("rights_buy_outs", data.rights_buy_outs.is_some()),
            ("conditions", data.conditions.is_some()),
        ];
        for (column, present) in fields {
            if present {
                bind_count += 1;
                query.push_str(&format!(", {} = ${}", column, bind_count));
            }
        }

        query.push_str(&format!(
            " WHERE project_id = $1 RETURNING {SHEET_COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, FactSheet>(&query).bind(project_id);

        if let Some(v) = data.client_reference {
            q = q.bind(v);
        }
        if let Some(v) = data.casting_reference {
            q = q.bind(v);
        }
        if let Some(v) = data.project_name {
            q = q.bind(v);
        }
        if let Some(v) = data.director {
            q = q.bind(v);
        }
        if let Some(v) = data.deadline_date {
            q = q.bind(v);
        }
        if let Some(v) = data.ppm_date {
            q = q.bind(v);
        }
        if let Some(v) = data.project_description {
            q = q.bind(v);
        }
        if let Some(v) = data.shooting_date {
            q = q.bind(v);
        }
        if let Some(v) = data.location {
            q = q.bind(v);
        }
        if let Some(v) = data.total_hours {
            q = q.bind(v);
        }
        if let Some(v) = data.time_range_start {
            q = q.bind(v);
        }
        if let Some(v) = data.time_range_end {
            q = q.bind(v);
        }
        if let Some(v) = data.budget_details {
            q = q.bind(v);
        }
        if let Some(v) = data.terms {
            q = q.bind(v);
        }
        if let Some(v) = data.total_project_price {
            q = q.bind(v);
        }
        if let Some(v) = data.rights_buy_outs {
            q = q.bind(v);
        }
        if let Some(v) = data.conditions {
            q = q.bind(v);
        }

        let sheet = q.fetch_optional(pool).await?;

        Ok(sheet)
    }

    /// Records an approval decision
    ///
    /// `approved` stamps the decision time and deciding admin; any other
    /// status clears both.
    pub async fn set_status(
        pool: &PgPool,
        project_id: i32,
        status: FactSheetStatus,
        decided_by: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sheet = sqlx::query_as::<_, FactSheet>(&format!(
            r#"
            UPDATE fact_sheets
            SET status = $2,
                approved_at = CASE WHEN $2 = 'approved'::fact_sheet_status THEN NOW() ELSE NULL END,
                approved_by_id = CASE WHEN $2 = 'approved'::fact_sheet_status THEN $3 ELSE NULL END,
                updated_at = NOW()
            WHERE project_id = $1
            RETURNING {SHEET_COLUMNS}
            "#,
        ))
        .bind(project_id)
        .bind(status)
        .bind(decided_by)
        .fetch_optional(pool)
        .await?;

        Ok(sheet)
    }
}
