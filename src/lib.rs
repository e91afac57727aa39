//! Servicio de demandes de livraison
//!
//! Ciclo de vida de las demandes, asignación de livreurs por un manager y
//! el cliente HTTP que consume ambos servicios REST.

pub mod client;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;
