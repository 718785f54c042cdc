use bson::doc;
use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{Property, PropertyCreate, PropertyStatus, PROPERTIES};
use super::records;
use super::service::ListingServiceError;
use crate::store::DocumentStore;

/// Result of the startup seeding check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The collection was empty and the sample listings were written.
    Seeded(usize),
    /// The collection already held listings; nothing was written.
    Skipped { existing: u64 },
}

struct SampleListing {
    title: &'static str,
    address: &'static str,
    price: &'static str,
    bedrooms: i64,
    bathrooms: i64,
    sqft: i64,
    image: &'static str,
    description: &'static str,
}

const SAMPLE_LISTINGS: [SampleListing; 6] = [
    SampleListing {
        title: "Modern Downtown Loft",
        address: "123 Main St, Downtown",
        price: "$450,000",
        bedrooms: 2,
        bathrooms: 2,
        sqft: 1200,
        image: "https://images.unsplash.com/photo-1486406146926-c627a92ad1ab?w=800",
        description: "Stunning modern loft in the heart of downtown with city views and premium finishes.",
    },
    SampleListing {
        title: "Suburban Family Home",
        address: "456 Oak Avenue, Suburbs",
        price: "$620,000",
        bedrooms: 4,
        bathrooms: 3,
        sqft: 2400,
        image: "https://images.unsplash.com/photo-1560518883-ce09059eeffa?w=800",
        description: "Spacious family home with large backyard, perfect for growing families.",
    },
    SampleListing {
        title: "Luxury Waterfront Villa",
        address: "789 Beach Road, Coastline",
        price: "$1,250,000",
        bedrooms: 5,
        bathrooms: 4,
        sqft: 3800,
        image: "https://images.unsplash.com/photo-1639663742190-1b3dba2eebcf?w=800",
        description: "Breathtaking waterfront property with panoramic ocean views and private beach access.",
    },
    SampleListing {
        title: "Cozy Urban Studio",
        address: "321 City Center, Urban District",
        price: "$280,000",
        bedrooms: 1,
        bathrooms: 1,
        sqft: 650,
        image: "https://images.unsplash.com/photo-1638541420159-cadd0634f08f?w=800",
        description: "Efficient and stylish studio apartment in prime urban location with modern amenities.",
    },
    SampleListing {
        title: "Mountain View Retreat",
        address: "555 Highland Drive, Mountain Area",
        price: "$890,000",
        bedrooms: 3,
        bathrooms: 3,
        sqft: 2800,
        image: "https://images.unsplash.com/photo-1639145044835-ec083afa6ebb?w=800",
        description: "Peaceful mountain retreat with stunning views and custom craftsmanship throughout.",
    },
    SampleListing {
        title: "Historic Renovated Townhouse",
        address: "888 Heritage Lane, Old Town",
        price: "$725,000",
        bedrooms: 3,
        bathrooms: 2,
        sqft: 2100,
        image: "https://images.pexels.com/photos/323780/pexels-photo-323780.jpeg?w=800",
        description: "Beautifully renovated historic townhouse blending classic charm with modern comfort.",
    },
];

/// The canonical listings written into an empty collection.
pub fn sample_properties(created_at: DateTime<Utc>) -> Vec<Property> {
    SAMPLE_LISTINGS
        .iter()
        .map(|sample| {
            Property::from_create(
                PropertyCreate {
                    title: sample.title.to_string(),
                    address: sample.address.to_string(),
                    price: sample.price.to_string(),
                    bedrooms: sample.bedrooms,
                    bathrooms: sample.bathrooms,
                    sqft: sample.sqft,
                    image: sample.image.to_string(),
                    description: sample.description.to_string(),
                    status: PropertyStatus::Available,
                },
                created_at,
            )
        })
        .collect()
}

/// Counts the listings and writes the samples only when there are none.
pub async fn seed_properties<S>(store: &S) -> Result<SeedOutcome, ListingServiceError>
where
    S: DocumentStore + ?Sized,
{
    let existing = store.count(PROPERTIES, doc! {}).await?;
    if existing > 0 {
        info!(existing, "properties present, skipping sample seed");
        return Ok(SeedOutcome::Skipped { existing });
    }

    let documents = sample_properties(records::creation_time())
        .iter()
        .map(|property| records::to_document(property, &property.created_at))
        .collect::<Result<Vec<_>, _>>()?;

    let written = store.insert_many(PROPERTIES, documents).await?;
    info!(written, "sample properties seeded");
    Ok(SeedOutcome::Seeded(written))
}
