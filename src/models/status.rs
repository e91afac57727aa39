//! Modelo de estado de una demande
//!
//! Ciclo de vida: `CREATED` → `ASSIGNED` → `EN_COURS` → `LIVRE`, con
//! `CANCELLED` alcanzable desde cualquier estado no terminal.
//! `LIVRE` y `CANCELLED` son terminales.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estado de la demande - mapea al ENUM statut_demande
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "statut_demande", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusDemande {
    Created,
    Assigned,
    EnCours,
    Livre,
    Cancelled,
}

/// Clase de presentación para un estado desconocido
pub const NEUTRAL_STATUS_CLASS: &str = "bg-gray-100 text-gray-800";

impl StatusDemande {
    /// Todos los estados, en el orden del ciclo de vida
    pub fn all() -> [StatusDemande; 5] {
        [
            StatusDemande::Created,
            StatusDemande::Assigned,
            StatusDemande::EnCours,
            StatusDemande::Livre,
            StatusDemande::Cancelled,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusDemande::Created => "CREATED",
            StatusDemande::Assigned => "ASSIGNED",
            StatusDemande::EnCours => "EN_COURS",
            StatusDemande::Livre => "LIVRE",
            StatusDemande::Cancelled => "CANCELLED",
        }
    }

    /// Etiqueta legible para la interfaz
    pub fn display_text(&self) -> &'static str {
        match self {
            StatusDemande::Created => "Created",
            StatusDemande::Assigned => "Assigned",
            StatusDemande::EnCours => "In Progress",
            StatusDemande::Livre => "Delivered",
            StatusDemande::Cancelled => "Cancelled",
        }
    }

    /// Clases CSS del badge de estado
    pub fn display_class(&self) -> &'static str {
        match self {
            StatusDemande::Created => "bg-blue-100 text-blue-800",
            StatusDemande::Assigned => "bg-yellow-100 text-yellow-800",
            StatusDemande::EnCours => "bg-orange-100 text-orange-800",
            StatusDemande::Livre => "bg-green-100 text-green-800",
            StatusDemande::Cancelled => "bg-red-100 text-red-800",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusDemande::Livre | StatusDemande::Cancelled)
    }

    /// Estados que solo tienen sentido con un livreur vinculado
    pub fn requires_livreur(&self) -> bool {
        matches!(self, StatusDemande::Assigned | StatusDemande::EnCours)
    }

    /// Transiciones permitidas. Quedarse en el mismo estado siempre es válido.
    pub fn can_transition_to(&self, next: StatusDemande) -> bool {
        use StatusDemande::*;

        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (Created, Assigned)
                | (Created, EnCours)
                | (Created, Cancelled)
                | (Assigned, EnCours)
                | (Assigned, Cancelled)
                | (EnCours, Livre)
                | (EnCours, Cancelled)
        )
    }
}

impl fmt::Display for StatusDemande {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown demande status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for StatusDemande {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(StatusDemande::Created),
            "ASSIGNED" => Ok(StatusDemande::Assigned),
            "EN_COURS" => Ok(StatusDemande::EnCours),
            "LIVRE" => Ok(StatusDemande::Livre),
            "CANCELLED" => Ok(StatusDemande::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Etiqueta de un estado recibido como texto; un valor desconocido se devuelve tal cual
pub fn status_display_text(raw: &str) -> String {
    raw.parse::<StatusDemande>()
        .map(|status| status.display_text().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Clase de un estado recibido como texto; un valor desconocido da la clase neutra
pub fn status_display_class(raw: &str) -> &'static str {
    raw.parse::<StatusDemande>()
        .map(|status| status.display_class())
        .unwrap_or(NEUTRAL_STATUS_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_total() {
        for status in StatusDemande::all() {
            assert!(!status.display_text().is_empty());
            assert!(!status.display_class().is_empty());
            assert_eq!(status.as_str().parse::<StatusDemande>(), Ok(status));
        }
    }

    #[test]
    fn test_display_text_labels() {
        assert_eq!(StatusDemande::EnCours.display_text(), "In Progress");
        assert_eq!(StatusDemande::Livre.display_text(), "Delivered");
        assert_eq!(status_display_text("CANCELLED"), "Cancelled");
    }

    #[test]
    fn test_unknown_status_fallbacks() {
        assert_eq!(status_display_text("ARCHIVED"), "ARCHIVED");
        assert_eq!(status_display_text(""), "");
        assert_eq!(status_display_class("ARCHIVED"), NEUTRAL_STATUS_CLASS);
        assert_eq!(status_display_class("created"), NEUTRAL_STATUS_CLASS);
    }

    #[test]
    fn test_serde_wire_format() {
        assert_eq!(
            serde_json::to_string(&StatusDemande::EnCours).unwrap(),
            "\"EN_COURS\""
        );
        let parsed: StatusDemande = serde_json::from_str("\"LIVRE\"").unwrap();
        assert_eq!(parsed, StatusDemande::Livre);
    }

    #[test]
    fn test_transitions() {
        use StatusDemande::*;

        assert!(Created.can_transition_to(Assigned));
        assert!(Assigned.can_transition_to(EnCours));
        assert!(EnCours.can_transition_to(Livre));
        assert!(EnCours.can_transition_to(Cancelled));
        assert!(Livre.can_transition_to(Livre));
        assert!(Assigned.requires_livreur());
        assert!(!Cancelled.requires_livreur());

        assert!(!Assigned.can_transition_to(Created));
        assert!(!Created.can_transition_to(Livre));
        for next in StatusDemande::all() {
            if next != Livre {
                assert!(!Livre.can_transition_to(next));
            }
            if next != Cancelled {
                assert!(!Cancelled.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<_> = StatusDemande::all()
            .into_iter()
            .filter(StatusDemande::is_terminal)
            .collect();
        assert_eq!(terminal, vec![StatusDemande::Livre, StatusDemande::Cancelled]);
    }
}
