//! Fixture data shared by unit, behaviour and property tests.
//!
//! [`bangalore_providers`] returns eight clinics spread across Bangalore,
//! listed in a fixed order so tests can assert on insertion order.
//!
//! # Example
//!
//! ```
//! use nearcare_core::{MemoryRecordStore, QueryEngine, test_support::bangalore_providers};
//!
//! let engine = QueryEngine::new(MemoryRecordStore::default()).unwrap();
//! engine.create_many(bangalore_providers()).unwrap();
//! assert_eq!(engine.len().unwrap(), 8);
//! ```

use crate::{GeoPoint, NewProvider};

/// `(name, specialty, organisation, address, longitude, latitude, phone, email)`.
type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    f64,
    f64,
    &'static str,
    &'static str,
);

const BANGALORE: [SampleRow; 8] = [
    (
        "Dr. Rajesh Kumar",
        "Cardiology",
        "Heart Care Center",
        "123 MG Road, Bangalore, Karnataka 560001",
        77.6033,
        12.9716,
        "+91-9876543210",
        "rajesh.kumar@heartcare.com",
    ),
    (
        "Dr. Priya Sharma",
        "Dermatology",
        "Skin Wellness Clinic",
        "456 JP Nagar 7th Phase, Bangalore, Karnataka 560078",
        77.5946,
        12.9082,
        "+91-9876543211",
        "priya.sharma@skinwellness.com",
    ),
    (
        "Dr. Amit Patel",
        "Orthopedics",
        "Bone & Joint Clinic",
        "789 Koramangala 4th Block, Bangalore, Karnataka 560034",
        77.6271,
        12.9352,
        "+91-9876543212",
        "amit.patel@bonejoint.com",
    ),
    (
        "Dr. Sunita Reddy",
        "Pediatrics",
        "Children's Health Center",
        "321 Indiranagar 100 Feet Road, Bangalore, Karnataka 560038",
        77.6408,
        12.9784,
        "+91-9876543213",
        "sunita.reddy@childhealth.com",
    ),
    (
        "Dr. Vikram Singh",
        "Neurology",
        "Brain & Spine Institute",
        "654 Whitefield Main Road, Bangalore, Karnataka 560066",
        77.7499,
        12.9698,
        "+91-9876543214",
        "vikram.singh@brainspine.com",
    ),
    (
        "Dr. Meera Nair",
        "Gynecology",
        "Women's Care Clinic",
        "987 Jayanagar 4th Block, Bangalore, Karnataka 560011",
        77.5833,
        12.9279,
        "+91-9876543215",
        "meera.nair@womenscare.com",
    ),
    (
        "Dr. Arjun Gupta",
        "ENT",
        "Ear Nose Throat Specialists",
        "147 HSR Layout Sector 1, Bangalore, Karnataka 560102",
        77.6387,
        12.9116,
        "+91-9876543216",
        "arjun.gupta@entspecialists.com",
    ),
    (
        "Dr. Kavya Krishnan",
        "Ophthalmology",
        "Vision Care Center",
        "258 Malleshwaram 8th Cross, Bangalore, Karnataka 560003",
        77.5667,
        13.0039,
        "+91-9876543217",
        "kavya.krishnan@visioncare.com",
    ),
];

/// Eight Bangalore clinics as validated drafts, MG Road first.
///
/// # Panics
///
/// Never in practice; the table above holds valid rows only.
pub fn bangalore_providers() -> Vec<NewProvider> {
    BANGALORE
        .iter()
        .map(|&(name, specialty, organization, address, lon, lat, phone, email)| {
            let location = GeoPoint::new(lon, lat).expect("fixture coordinates are valid");
            let draft = NewProvider::new(name, specialty, organization, address, location)
                .expect("fixture rows are valid");
            draft.with_phone(phone).with_email(email)
        })
        .collect()
}

/// Draft with placeholder text fields at `(longitude, latitude)`.
///
/// # Panics
///
/// Panics if the coordinates are out of range.
pub fn provider_at(name: &str, address: &str, longitude: f64, latitude: f64) -> NewProvider {
    let location = GeoPoint::new(longitude, latitude).expect("valid test coordinates");
    NewProvider::new(name, "General Practice", "Test Clinic", address, location)
        .expect("valid test provider")
}
