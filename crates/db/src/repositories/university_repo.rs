//! Read-only repository for the seeded `universities` catalog.

use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::university::{University, UniversityFilter};

const COLUMNS: &str = "id, name, country, city, ranking, tuition_min, tuition_max, programs, \
                       acceptance_rate, ielts_requirement, gre_requirement, toefl_requirement, \
                       application_deadline, image_url, description";

pub struct UniversityRepo;

impl UniversityRepo {
    /// List the catalog in id order, applying whichever filters are set.
    pub async fn list(
        pool: &PgPool,
        filter: &UniversityFilter,
    ) -> Result<Vec<University>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM universities
             WHERE ($1::text IS NULL OR country ILIKE '%' || $1 || '%')
               AND ($2::int IS NULL OR tuition_max <= $2)
               AND ($3::text IS NULL OR EXISTS (
                     SELECT 1 FROM unnest(programs) AS p WHERE p ILIKE '%' || $3 || '%'))
             ORDER BY id"
        );
        sqlx::query_as::<_, University>(&query)
            .bind(&filter.country)
            .bind(filter.budget_max)
            .bind(&filter.program)
            .fetch_all(pool)
            .await
    }

    /// Candidates for recommendation: tuition within `tuition_ceiling` (when
    /// set) and country in `countries` (when non-empty, case-insensitive).
    pub async fn list_candidates(
        pool: &PgPool,
        tuition_ceiling: Option<f64>,
        countries: &[String],
    ) -> Result<Vec<University>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM universities
             WHERE ($1::float8 IS NULL OR tuition_max <= $1)
               AND (cardinality($2::text[]) = 0
                    OR lower(country) IN (SELECT lower(c) FROM unnest($2::text[]) AS c))
             ORDER BY id"
        );
        sqlx::query_as::<_, University>(&query)
            .bind(tuition_ceiling)
            .bind(countries)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<University>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM universities WHERE id = $1");
        sqlx::query_as::<_, University>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<University>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM universities WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, University>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
