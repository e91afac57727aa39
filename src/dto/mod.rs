pub mod demande_dto;
pub mod livreur_dto;
