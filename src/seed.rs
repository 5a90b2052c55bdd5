//! Sample catalog inserted into an empty store at boot.

use crate::error::AppError;
use crate::model::NewResource;
use crate::store::ResourceStore;

const CATALOG: &[(&str, &str, f64)] = &[
    ("Premium API Access", "Full access to premium API endpoints with unlimited requests", 2500.0),
    ("Database Storage", "Cloud database storage with 500GB capacity", 1200.0),
    ("SSL Certificate", "Extended validation SSL certificate for secure connections", 450.0),
    ("CDN Bandwidth", "Content delivery network with 1TB monthly bandwidth", 800.0),
    ("Backup Service", "Automated daily backups with 30-day retention", 350.0),
    ("Monitoring Tools", "Real-time application monitoring and alerting system", 600.0),
    ("Load Balancer", "High-availability load balancing service", 1500.0),
    ("Cache Layer", "Redis cache with 10GB memory allocation", 550.0),
    ("Email Service", "Transactional email service with 50,000 emails/month", 300.0),
    ("Analytics Dashboard", "Advanced analytics and reporting dashboard", 950.0),
];

pub fn catalog() -> Vec<NewResource> {
    CATALOG
        .iter()
        .map(|(name, description, value)| NewResource::new(*name, Some(*description), *value))
        .collect()
}

/// Insert the catalog only when the store is empty. Returns how many records were written.
pub async fn seed_if_empty(store: &dyn ResourceStore) -> Result<usize, AppError> {
    let existing = store.count().await?;
    if existing > 0 {
        tracing::debug!(existing, "store not empty, skipping seed");
        return Ok(0);
    }
    let inserted = store.insert_many(catalog()).await?;
    tracing::info!(count = inserted.len(), "seed data inserted");
    Ok(inserted.len())
}
