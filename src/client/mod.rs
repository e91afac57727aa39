//! Cliente de los servicios REST
//!
//! Clientes reqwest para el servicio de demandes y el de livreurs/managers,
//! más el estado de formularios y vistas que los orquesta.

pub mod config;
pub mod demande_client;
pub mod error;
pub mod forms;
pub mod livreur_client;
pub mod views;

pub use config::ClientConfig;
pub use demande_client::DemandeApiClient;
pub use error::ClientError;
pub use livreur_client::LivreurApiClient;
