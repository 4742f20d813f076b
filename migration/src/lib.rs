pub use sea_orm_migration::prelude::*;

mod m20250801_000001_create_clients_table;
mod m20250801_000002_create_providers_table;
mod m20250801_000003_create_gigs_table;
mod m20250801_000004_create_broadcasts_table;
mod m20250801_000005_add_allocation_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_clients_table::Migration),
            Box::new(m20250801_000002_create_providers_table::Migration),
            Box::new(m20250801_000003_create_gigs_table::Migration),
            Box::new(m20250801_000004_create_broadcasts_table::Migration),
            Box::new(m20250801_000005_add_allocation_indexes::Migration),
        ]
    }
}
