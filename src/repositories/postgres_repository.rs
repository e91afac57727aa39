use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use super::DeliveryRepository;
use crate::models::{
    Assignment, Demande, DemandePatch, Livreur, LivreurPatch, Manager, NewDemande, NewLivreur,
    StatusDemande,
};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

// Demande con su manager y su livreur (LEFT JOIN: columnas del livreur opcionales)
const DEMANDE_SELECT: &str = r#"
    SELECT d.id, d.lieu_depart, d.lieu_arrivee, d.statut, d.created_at, d.assigned_at,
           m.id AS manager_id, m.nom AS manager_nom, m.email AS manager_email,
           l.id AS livreur_id, l.nom AS livreur_nom, l.email AS livreur_email,
           l.disponible AS livreur_disponible, l.password_hash AS livreur_password_hash
    FROM demandes d
    JOIN managers m ON m.id = d.manager_id
    LEFT JOIN livreurs l ON l.id = d.livreur_id
"#;

// Código SQLSTATE de violación de unicidad
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, sqlx::FromRow)]
struct DemandeRow {
    id: i64,
    lieu_depart: String,
    lieu_arrivee: String,
    statut: StatusDemande,
    created_at: DateTime<Utc>,
    assigned_at: Option<DateTime<Utc>>,
    manager_id: i64,
    manager_nom: String,
    manager_email: String,
    livreur_id: Option<i64>,
    livreur_nom: Option<String>,
    livreur_email: Option<String>,
    livreur_disponible: Option<bool>,
    livreur_password_hash: Option<String>,
}

impl From<DemandeRow> for Demande {
    fn from(row: DemandeRow) -> Self {
        let livreur = match (
            row.livreur_id,
            row.livreur_nom,
            row.livreur_email,
            row.livreur_disponible,
        ) {
            (Some(id), Some(nom), Some(email), Some(disponible)) => Some(Livreur {
                id,
                nom,
                email,
                disponible,
                password_hash: row.livreur_password_hash.unwrap_or_default(),
            }),
            _ => None,
        };

        Self {
            id: row.id,
            lieu_depart: row.lieu_depart,
            lieu_arrivee: row.lieu_arrivee,
            statut: row.statut,
            created_at: row.created_at,
            assigned_at: row.assigned_at,
            manager: Manager {
                id: row.manager_id,
                nom: row.manager_nom,
                email: row.manager_email,
            },
            livreur,
        }
    }
}

fn map_unique_violation(e: sqlx::Error, email: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            conflict_error("Livreur", "email", email)
        }
        _ => AppError::Database(e),
    }
}

// Helpers sobre una conexión, usables dentro y fuera de una transacción

async fn fetch_demande(conn: &mut PgConnection, id: i64) -> AppResult<Option<Demande>> {
    let row = sqlx::query_as::<_, DemandeRow>(&format!("{} WHERE d.id = $1", DEMANDE_SELECT))
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(Demande::from))
}

async fn lock_demande(conn: &mut PgConnection, id: i64) -> AppResult<Demande> {
    let row = sqlx::query_as::<_, DemandeRow>(&format!(
        "{} WHERE d.id = $1 FOR UPDATE OF d",
        DEMANDE_SELECT
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    row.map(Demande::from)
        .ok_or_else(|| not_found_error("Demande", id))
}

async fn fetch_livreur(conn: &mut PgConnection, id: i64) -> AppResult<Option<Livreur>> {
    let livreur = sqlx::query_as::<_, Livreur>(
        "SELECT id, nom, email, disponible, password_hash FROM livreurs WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(livreur)
}

async fn manager_exists(conn: &mut PgConnection, id: i64) -> AppResult<bool> {
    let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM managers WHERE id = $1)")
        .bind(id)
        .fetch_one(conn)
        .await?;

    Ok(result.0)
}

async fn insert_demande(conn: &mut PgConnection, demande: &NewDemande) -> AppResult<i64> {
    if !manager_exists(&mut *conn, demande.manager_id).await? {
        return Err(not_found_error("Manager", demande.manager_id));
    }

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO demandes (lieu_depart, lieu_arrivee, statut, created_at, manager_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&demande.lieu_depart)
    .bind(&demande.lieu_arrivee)
    .bind(StatusDemande::Created)
    .bind(Utc::now())
    .bind(demande.manager_id)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

async fn save_demande(conn: &mut PgConnection, demande: &Demande) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE demandes
        SET lieu_depart = $2, lieu_arrivee = $3, statut = $4, assigned_at = $5, livreur_id = $6
        WHERE id = $1
        "#,
    )
    .bind(demande.id)
    .bind(&demande.lieu_depart)
    .bind(&demande.lieu_arrivee)
    .bind(demande.statut)
    .bind(demande.assigned_at)
    .bind(demande.livreur.as_ref().map(|l| l.id))
    .execute(conn)
    .await?;

    Ok(())
}

async fn assign(conn: &mut PgConnection, assignment: Assignment) -> AppResult<Demande> {
    let mut demande = lock_demande(&mut *conn, assignment.demande_id).await?;
    let livreur = fetch_livreur(&mut *conn, assignment.livreur_id)
        .await?
        .ok_or_else(|| not_found_error("Livreur", assignment.livreur_id))?;
    if !manager_exists(&mut *conn, assignment.manager_id).await? {
        return Err(not_found_error("Manager", assignment.manager_id));
    }

    demande.ensure_owned_by(assignment.manager_id)?;
    demande.assign_to(livreur, assignment.at)?;
    save_demande(&mut *conn, &demande).await?;

    Ok(demande)
}

/// Repositorio PostgreSQL
pub struct PgDeliveryRepository {
    pool: PgPool,
}

impl PgDeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, clause: &str, param: Option<i64>) -> AppResult<Vec<Demande>> {
        let sql = format!("{} {} ORDER BY d.id", DEMANDE_SELECT, clause);
        let mut query = sqlx::query_as::<_, DemandeRow>(&sql);
        if let Some(param) = param {
            query = query.bind(param);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Demande::from).collect())
    }
}

#[async_trait]
impl DeliveryRepository for PgDeliveryRepository {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list_demandes(&self) -> AppResult<Vec<Demande>> {
        self.list_where("", None).await
    }

    async fn find_demande(&self, id: i64) -> AppResult<Option<Demande>> {
        let mut conn = self.pool.acquire().await?;
        fetch_demande(&mut conn, id).await
    }

    async fn demandes_by_manager(&self, manager_id: i64) -> AppResult<Vec<Demande>> {
        self.list_where("WHERE d.manager_id = $1", Some(manager_id)).await
    }

    async fn demandes_by_livreur(&self, livreur_id: i64) -> AppResult<Vec<Demande>> {
        self.list_where("WHERE d.livreur_id = $1", Some(livreur_id)).await
    }

    async fn unassigned_demandes(&self) -> AppResult<Vec<Demande>> {
        self.list_where("WHERE d.livreur_id IS NULL", None).await
    }

    async fn create_demande(&self, demande: NewDemande) -> AppResult<Demande> {
        let mut tx = self.pool.begin().await?;
        let id = insert_demande(&mut tx, &demande).await?;
        let created = fetch_demande(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("demande {} vanished after insert", id)))?;
        tx.commit().await?;

        debug!("💾 Demande {} insertada", id);
        Ok(created)
    }

    async fn update_demande(&self, id: i64, patch: DemandePatch) -> AppResult<Demande> {
        let mut tx = self.pool.begin().await?;
        let mut demande = lock_demande(&mut tx, id).await?;

        let livreur = match patch.livreur_id {
            None => None,
            Some(None) => Some(None),
            Some(Some(livreur_id)) => Some(Some(
                fetch_livreur(&mut tx, livreur_id)
                    .await?
                    .ok_or_else(|| not_found_error("Livreur", livreur_id))?,
            )),
        };

        demande.apply_update(patch, livreur)?;
        save_demande(&mut tx, &demande).await?;
        tx.commit().await?;

        Ok(demande)
    }

    async fn delete_demande(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM demandes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Demande", id));
        }
        Ok(())
    }

    async fn assign_livreur(&self, assignment: Assignment) -> AppResult<Demande> {
        let mut tx = self.pool.begin().await?;
        let demande = assign(&mut tx, assignment).await?;
        tx.commit().await?;

        Ok(demande)
    }

    async fn create_and_assign(
        &self,
        demande: NewDemande,
        livreur_id: i64,
        at: DateTime<Utc>,
    ) -> AppResult<Demande> {
        // Si algo falla, la transacción se descarta sin commit (rollback)
        let mut tx = self.pool.begin().await?;
        let id = insert_demande(&mut tx, &demande).await?;
        let assigned = assign(
            &mut tx,
            Assignment {
                demande_id: id,
                livreur_id,
                manager_id: demande.manager_id,
                at,
            },
        )
        .await?;
        tx.commit().await?;

        Ok(assigned)
    }

    async fn list_livreurs(&self, disponible: Option<bool>) -> AppResult<Vec<Livreur>> {
        let livreurs = sqlx::query_as::<_, Livreur>(
            r#"
            SELECT id, nom, email, disponible, password_hash
            FROM livreurs
            WHERE ($1::BOOLEAN IS NULL OR disponible = $1)
            ORDER BY id
            "#,
        )
        .bind(disponible)
        .fetch_all(&self.pool)
        .await?;

        Ok(livreurs)
    }

    async fn find_livreur(&self, id: i64) -> AppResult<Option<Livreur>> {
        let mut conn = self.pool.acquire().await?;
        fetch_livreur(&mut conn, id).await
    }

    async fn create_livreur(&self, livreur: NewLivreur) -> AppResult<Livreur> {
        let created = sqlx::query_as::<_, Livreur>(
            r#"
            INSERT INTO livreurs (nom, email, disponible, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, nom, email, disponible, password_hash
            "#,
        )
        .bind(&livreur.nom)
        .bind(&livreur.email)
        .bind(livreur.disponible)
        .bind(&livreur.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &livreur.email))?;

        Ok(created)
    }

    async fn update_livreur(&self, id: i64, patch: LivreurPatch) -> AppResult<Livreur> {
        let mut tx = self.pool.begin().await?;
        let mut livreur = sqlx::query_as::<_, Livreur>(
            r#"
            SELECT id, nom, email, disponible, password_hash
            FROM livreurs
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found_error("Livreur", id))?;

        livreur.apply_patch(patch);

        sqlx::query(
            r#"
            UPDATE livreurs
            SET nom = $2, email = $3, disponible = $4, password_hash = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&livreur.nom)
        .bind(&livreur.email)
        .bind(livreur.disponible)
        .bind(&livreur.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &livreur.email))?;

        tx.commit().await?;
        Ok(livreur)
    }

    async fn delete_livreur(&self, id: i64) -> AppResult<()> {
        // ON DELETE SET NULL desvincula las demandes
        let result = sqlx::query("DELETE FROM livreurs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Livreur", id));
        }
        Ok(())
    }

    async fn list_managers(&self) -> AppResult<Vec<Manager>> {
        let managers =
            sqlx::query_as::<_, Manager>("SELECT id, nom, email FROM managers ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(managers)
    }

    async fn find_manager(&self, id: i64) -> AppResult<Option<Manager>> {
        let manager =
            sqlx::query_as::<_, Manager>("SELECT id, nom, email FROM managers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(manager)
    }
}
