// src/db/seed.rs
//
// Demo data: California universities, a demo owner and a handful of
// listings near campuses so the map is populated on first start.

use crate::db::connection::Database;
use crate::db::listings::insert_listing;
use crate::db::universities::upsert_university;
use crate::db::users::get_or_create_user;
use crate::domain::listing::ListingChanges;
use crate::domain::university::University;
use crate::errors::ServerError;
use chrono::Utc;
use rusqlite::params;

/// (name, full name, lat, lng)
pub const UNIVERSITIES: &[(&str, &str, f64, f64)] = &[
    ("UCLA", "University of California, Los Angeles", 34.0689, -118.4452),
    ("UC Berkeley", "University of California, Berkeley", 37.8719, -122.2585),
    ("UCSD", "University of California, San Diego", 32.8801, -117.2340),
    ("UC Irvine", "University of California, Irvine", 33.6405, -117.8443),
    ("UC Davis", "University of California, Davis", 38.5382, -121.7617),
    ("UC Santa Barbara", "University of California, Santa Barbara", 34.4140, -119.8489),
    ("UC Santa Cruz", "University of California, Santa Cruz", 36.9914, -122.0609),
    ("UC Riverside", "University of California, Riverside", 33.9737, -117.3281),
    ("UC Merced", "University of California, Merced", 37.3660, -120.4248),
    ("UCSF", "University of California, San Francisco", 37.7631, -122.4586),
    ("CSUN", "California State University, Northridge", 34.2381, -118.5285),
    ("CSULB", "California State University, Long Beach", 33.7838, -118.1141),
    ("CSUF", "California State University, Fullerton", 33.8829, -117.8869),
    ("SDSU", "San Diego State University", 32.7757, -117.0719),
    ("SJSU", "San José State University", 37.3352, -121.8811),
    ("SF State", "San Francisco State University", 37.7241, -122.4783),
    ("Cal Poly SLO", "California Polytechnic State University, San Luis Obispo", 35.3050, -120.6625),
    ("Cal Poly Pomona", "California State Polytechnic University, Pomona", 34.0565, -117.8215),
    ("Fresno State", "California State University, Fresno", 36.8134, -119.7483),
    ("Sac State", "California State University, Sacramento", 38.5607, -121.4234),
    ("Cal State LA", "California State University, Los Angeles", 34.0667, -118.1690),
    ("CSU East Bay", "California State University, East Bay", 37.6565, -122.0568),
    ("Chico State", "California State University, Chico", 39.7301, -121.8455),
    ("Sonoma State", "Sonoma State University", 38.3394, -122.6741),
    ("Humboldt", "Cal Poly Humboldt", 40.8760, -124.0786),
    ("CSU Dominguez Hills", "California State University, Dominguez Hills", 33.8636, -118.2553),
    ("CSU San Bernardino", "California State University, San Bernardino", 34.1812, -117.3237),
    ("CSU Bakersfield", "California State University, Bakersfield", 35.3507, -119.1026),
    ("Stanislaus State", "California State University, Stanislaus", 37.5256, -120.8561),
    ("CSU Monterey Bay", "California State University, Monterey Bay", 36.6536, -121.7989),
    ("CSU San Marcos", "California State University, San Marcos", 33.1284, -117.1597),
    ("CSU Channel Islands", "California State University, Channel Islands", 34.1625, -119.0452),
    ("Maritime Academy", "California State University Maritime Academy", 38.0698, -122.2310),
    ("Stanford", "Stanford University", 37.4275, -122.1697),
    ("USC", "University of Southern California", 34.0224, -118.2851),
    ("Caltech", "California Institute of Technology", 34.1377, -118.1253),
    ("Pepperdine", "Pepperdine University", 34.0360, -118.7095),
    ("LMU", "Loyola Marymount University", 33.9700, -118.4179),
    ("USD", "University of San Diego", 32.7719, -117.1881),
    ("Santa Clara", "Santa Clara University", 37.3496, -121.9390),
    ("USF", "University of San Francisco", 37.7765, -122.4506),
    ("Chapman", "Chapman University", 33.7930, -117.8514),
    ("Pomona College", "Pomona College", 34.0977, -117.7112),
];

pub struct DemoListing {
    pub title: &'static str,
    pub description: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub zip_code: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub rent: f64,
    pub bedrooms: &'static str,
    pub bathrooms: &'static str,
    pub sqft: i64,
    pub room_type: &'static str,
    pub amenities: &'static str,
}

pub const DEMO_OWNER: &str = "demo_owner";

pub const DEMO_LISTINGS: &[DemoListing] = &[
    DemoListing {
        title: "2BR Near CSUN - Modern & Bright",
        description: "Spacious 2 bedroom apartment a short walk from CSUN. Updated kitchen, in-unit laundry.",
        address: "9301 Reseda Blvd",
        city: "Northridge",
        zip_code: "91324",
        lat: 34.2230,
        lng: -118.5390,
        rent: 1950.0,
        bedrooms: "2",
        bathrooms: "1",
        sqft: 900,
        room_type: "Apartment",
        amenities: "WiFi,Parking,Laundry,AC",
    },
    DemoListing {
        title: "Studio Near UCLA - Perfect for Students",
        description: "Cozy studio apartment 5 minutes from UCLA campus. Bills included.",
        address: "10920 Wilshire Blvd",
        city: "Los Angeles",
        zip_code: "90024",
        lat: 34.0600,
        lng: -118.4450,
        rent: 1600.0,
        bedrooms: "Studio",
        bathrooms: "1",
        sqft: 420,
        room_type: "Studio",
        amenities: "WiFi,Gym,Pool",
    },
    DemoListing {
        title: "1BR in Koreatown - Close to USC",
        description: "Clean 1 bedroom near USC and Metro. Quiet building, gated parking.",
        address: "3470 Wilshire Blvd",
        city: "Los Angeles",
        zip_code: "90010",
        lat: 34.0580,
        lng: -118.3000,
        rent: 1750.0,
        bedrooms: "1",
        bathrooms: "1",
        sqft: 650,
        room_type: "Apartment",
        amenities: "WiFi,Parking,Laundry",
    },
    DemoListing {
        title: "3BR House Near SDSU - Split with Friends",
        description: "Full 3 bedroom house near SDSU. Great for 3 roommates. Backyard, street parking.",
        address: "5402 College Ave",
        city: "San Diego",
        zip_code: "92115",
        lat: 32.7800,
        lng: -117.0700,
        rent: 2800.0,
        bedrooms: "3",
        bathrooms: "2",
        sqft: 1200,
        room_type: "House",
        amenities: "Parking,Laundry,Backyard,Pet Friendly",
    },
    DemoListing {
        title: "Private Room in Shared House - Berkeley",
        description: "Furnished private room in a shared 4BR house near UC Berkeley. All utilities included.",
        address: "2519 Telegraph Ave",
        city: "Berkeley",
        zip_code: "94704",
        lat: 37.8650,
        lng: -122.2590,
        rent: 1200.0,
        bedrooms: "1",
        bathrooms: "1",
        sqft: 220,
        room_type: "Private Room",
        amenities: "WiFi,Furnished,Utilities Included",
    },
    DemoListing {
        title: "2BR Condo - Walking Distance to SJSU",
        description: "Modern 2BR condo in downtown San Jose, 10 min walk to SJSU. City views.",
        address: "200 S 2nd St",
        city: "San Jose",
        zip_code: "95113",
        lat: 37.3350,
        lng: -121.8850,
        rent: 2200.0,
        bedrooms: "2",
        bathrooms: "2",
        sqft: 1050,
        room_type: "Condo",
        amenities: "WiFi,Gym,Doorman,Parking",
    },
    DemoListing {
        title: "Studio Loft Near Stanford",
        description: "Open-concept studio loft in Palo Alto. Ideal for Stanford grad students.",
        address: "400 University Ave",
        city: "Palo Alto",
        zip_code: "94301",
        lat: 37.4450,
        lng: -122.1600,
        rent: 2400.0,
        bedrooms: "Studio",
        bathrooms: "1",
        sqft: 510,
        room_type: "Studio",
        amenities: "WiFi,Bike Storage,AC",
    },
    DemoListing {
        title: "1BR Near CSULB - Quiet Neighborhood",
        description: "Well-maintained 1 bedroom apartment near Cal State Long Beach. On-site laundry.",
        address: "4400 Atlantic Ave",
        city: "Long Beach",
        zip_code: "90807",
        lat: 33.8100,
        lng: -118.1650,
        rent: 1650.0,
        bedrooms: "1",
        bathrooms: "1",
        sqft: 720,
        room_type: "Apartment",
        amenities: "Parking,Laundry,Pet Friendly",
    },
    DemoListing {
        title: "2BR Near Cal Poly Pomona",
        description: "Affordable 2 bedroom near Cal Poly Pomona. Gated complex with pool.",
        address: "1200 W Temple Ave",
        city: "Pomona",
        zip_code: "91768",
        lat: 34.0570,
        lng: -117.8230,
        rent: 1800.0,
        bedrooms: "2",
        bathrooms: "1",
        sqft: 880,
        room_type: "Apartment",
        amenities: "Pool,Parking,Laundry,AC",
    },
    DemoListing {
        title: "Shared Room Near Caltech - Furnished",
        description: "Furnished shared room in a 3BR apartment near Caltech. Great for researchers.",
        address: "500 S Lake Ave",
        city: "Pasadena",
        zip_code: "91101",
        lat: 34.1380,
        lng: -118.1270,
        rent: 950.0,
        bedrooms: "1",
        bathrooms: "1",
        sqft: 180,
        room_type: "Shared Room",
        amenities: "WiFi,Furnished,Utilities Included,AC",
    },
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub universities_created: usize,
    pub universities_updated: usize,
    pub listings_created: usize,
    pub listings_skipped: usize,
}

pub fn seed_universities(db: &Database) -> Result<(usize, usize), ServerError> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;
        let mut created = 0;
        for (name, full_name, lat, lng) in UNIVERSITIES {
            if upsert_university(&tx, &University::new(name, full_name, *lat, *lng))? {
                created += 1;
            }
        }
        tx.commit()?;
        Ok((created, UNIVERSITIES.len() - created))
    })
}

/// Demo listings are skipped when the same title already exists for the demo owner.
pub fn seed_demo_listings(db: &Database) -> Result<(usize, usize), ServerError> {
    let now = Utc::now().naive_utc();
    db.with_conn(|conn| {
        let tx = conn.transaction()?;
        let owner_id = get_or_create_user(&tx, DEMO_OWNER, "demo@campusrentals.test", now)?;

        let (mut created, mut skipped) = (0, 0);
        for demo in DEMO_LISTINGS {
            let exists: i64 = tx.query_row(
                "SELECT COUNT(*) FROM listings WHERE title = ?1 AND owner_id = ?2",
                params![demo.title, owner_id],
                |r| r.get(0),
            )?;
            if exists > 0 {
                skipped += 1;
                continue;
            }

            let changes = ListingChanges {
                title: Some(demo.title.to_string()),
                description: Some(demo.description.to_string()),
                address: Some(Some(demo.address.to_string())),
                city: Some(demo.city.to_string()),
                state: Some("CA".to_string()),
                zip_code: Some(Some(demo.zip_code.to_string())),
                latitude: Some(Some(demo.lat)),
                longitude: Some(Some(demo.lng)),
                monthly_rent: Some(demo.rent),
                bedrooms: Some(demo.bedrooms.to_string()),
                bathrooms: Some(demo.bathrooms.to_string()),
                square_feet: Some(Some(demo.sqft)),
                room_type: Some(demo.room_type.to_string()),
                amenities: Some(demo.amenities.to_string()),
                image_url: None,
                available_from: None,
                owner_id: Some(owner_id),
            };
            insert_listing(&tx, &changes, now)?;
            created += 1;
        }

        tx.commit()?;
        Ok((created, skipped))
    })
}

pub fn seed_all(db: &Database) -> Result<SeedReport, ServerError> {
    let (universities_created, universities_updated) = seed_universities(db)?;
    let (listings_created, listings_skipped) = seed_demo_listings(db)?;
    let report = SeedReport {
        universities_created,
        universities_updated,
        listings_created,
        listings_skipped,
    };
    tracing::info!(?report, "seed data applied");
    Ok(report)
}
