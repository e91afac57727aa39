//! Modelos de dominio
//!
//! Demandes de livraison, livreurs, managers y el modelo de estados.

pub mod demande;
pub mod livreur;
pub mod manager;
pub mod status;

pub use demande::{Assignment, Demande, DemandePatch, NewDemande};
pub use livreur::{Livreur, LivreurPatch, NewLivreur};
pub use manager::Manager;
pub use status::StatusDemande;
