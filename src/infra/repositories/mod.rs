pub mod postgres_catalog_repo;
pub mod postgres_maintenance_repo;
pub mod postgres_profile_repo;
pub mod postgres_reservation_repo;
pub mod sqlite_catalog_repo;
pub mod sqlite_maintenance_repo;
pub mod sqlite_profile_repo;
pub mod sqlite_reservation_repo;
