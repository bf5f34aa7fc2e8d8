//! Demo data for local development.
//!
//! Everything goes through the repositories, so the unique and booking
//! overlap rules apply to seeded rows the same way they do to API writes.

use anyhow::{Result, bail};
use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::database::models::{
    BookingWrite, MAX_REVIEW_IMAGES, ReviewFields, SignupFields, SpotFields, UserWrite,
};
use crate::database::repositories::{
    BookingRepository, ReviewImageRepository, ReviewRepository, SpotImageRepository,
    SpotRepository, UserRepository,
};

pub const DEMO_EMAIL: &str = "demo@user.io";

/// Settings for one seeding run. Built per call; nothing is shared between runs.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub password: String,
    pub bcrypt_cost: u32,
    /// Booking dates are laid out relative to this day.
    pub today: NaiveDate,
}

impl SeedOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            password: config.demo_password.clone(),
            bcrypt_cost: config.bcrypt_cost,
            today: Utc::now().date_naive(),
        }
    }
}

/// Rows inserted by a seeding run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SeedReport {
    pub users: usize,
    pub spots: usize,
    pub spot_images: usize,
    pub reviews: usize,
    pub review_images: usize,
    pub bookings: usize,
}

struct DemoUser {
    username: &'static str,
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
}

const USERS: [DemoUser; 3] = [
    DemoUser {
        username: "Demo-lition",
        email: DEMO_EMAIL,
        first_name: "Demo",
        last_name: "Lition",
    },
    DemoUser {
        username: "FakeUser1",
        email: "user1@user.io",
        first_name: "Fake",
        last_name: "One",
    },
    DemoUser {
        username: "FakeUser2",
        email: "user2@user.io",
        first_name: "Fake",
        last_name: "Two",
    },
];

struct DemoSpot {
    owner: usize,
    address: &'static str,
    city: &'static str,
    state: &'static str,
    lat: f64,
    lng: f64,
    name: &'static str,
    price: f64,
    images: usize,
}

const SPOTS: [DemoSpot; 3] = [
    DemoSpot {
        owner: 0,
        address: "123 Rainbow Rd.",
        city: "Sugar Land",
        state: "Texas",
        lat: 32.7767,
        lng: 96.797,
        name: "Rainbow Roadside Lodge",
        price: 123.0,
        images: 5,
    },
    DemoSpot {
        owner: 1,
        address: "Test Address 1",
        city: "Walnut",
        state: "California",
        lat: 77.777,
        lng: 99.999,
        name: "Test Spot 1",
        price: 1.0,
        images: 3,
    },
    DemoSpot {
        owner: 2,
        address: "Test Address 2",
        city: "Westminster",
        state: "California",
        lat: -77.777,
        lng: -99.999,
        name: "Test Spot 2",
        price: 10000.0,
        images: 4,
    },
];

// (author index, spot index, stars)
const REVIEWS: [(usize, usize, i64); 3] = [(1, 0, 5), (2, 0, 4), (0, 1, 3)];

// (guest index, spot index, days from today to check-in, nights)
const BOOKINGS: [(usize, usize, i64, i64); 3] = [(1, 0, 7, 2), (2, 1, 14, 14), (0, 2, 30, 4)];

const REVIEW_TEXT: &str = "Lorem ipsum odor amet, consectetuer adipiscing elit. Nulla fermentum \
    feugiat, ligula iaculis tempor himenaeos natoque.";

const SPOT_DESCRIPTION: &str = "A cozy stay on seven acres of private property. Lorem ipsum \
    odor amet, consectetuer adipiscing elit.";

/// Loads the demo data set unless the demo user already exists.
pub async fn seed_demo_data(pool: &SqlitePool, config: &Config) -> Result<SeedReport> {
    seed_with(pool, &SeedOptions::from_config(config)).await
}

pub async fn seed_with(pool: &SqlitePool, options: &SeedOptions) -> Result<SeedReport> {
    let users = UserRepository::new(pool.clone());
    let spots = SpotRepository::new(pool.clone());
    let spot_images = SpotImageRepository::new(pool.clone());
    let reviews = ReviewRepository::new(pool.clone());
    let review_images = ReviewImageRepository::new(pool.clone());
    let bookings = BookingRepository::new(pool.clone());

    if users.find_by_credential(DEMO_EMAIL).await?.is_some() {
        log::info!("Demo data already present, skipping seed");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();
    let hashed_password = bcrypt::hash(&options.password, options.bcrypt_cost)?;

    let mut user_ids = Vec::with_capacity(USERS.len());
    for demo in &USERS {
        let fields = SignupFields {
            email: demo.email.to_string(),
            username: demo.username.to_string(),
            password: options.password.clone(),
            first_name: demo.first_name.to_string(),
            last_name: demo.last_name.to_string(),
        };
        match users.create_user(&fields, &hashed_password).await? {
            UserWrite::Created(user) => user_ids.push(user.id),
            UserWrite::Taken(field) => {
                bail!("demo user {} has a taken {}", demo.username, field)
            }
        }
        report.users += 1;
    }

    let mut spot_ids = Vec::with_capacity(SPOTS.len());
    for (n, demo) in SPOTS.iter().enumerate() {
        let fields = SpotFields {
            address: demo.address.to_string(),
            city: demo.city.to_string(),
            state: demo.state.to_string(),
            country: "United States".to_string(),
            lat: demo.lat,
            lng: demo.lng,
            name: demo.name.to_string(),
            description: SPOT_DESCRIPTION.to_string(),
            price: demo.price,
        };
        let spot = spots.create_spot(user_ids[demo.owner], &fields).await?;
        report.spots += 1;

        for i in 0..demo.images {
            let url = format!("https://picsum.photos/500?v={}{}", n + 1, i);
            spot_images.create_image(spot.id, &url, i == 0).await?;
            report.spot_images += 1;
        }
        spot_ids.push(spot.id);
    }

    for (n, &(author, spot, stars)) in REVIEWS.iter().enumerate() {
        let fields = ReviewFields {
            review: REVIEW_TEXT.to_string(),
            stars,
        };
        let Some(review) = reviews
            .create_review(user_ids[author], spot_ids[spot], &fields)
            .await?
        else {
            bail!("demo review {} duplicates an existing review", n + 1);
        };
        report.reviews += 1;

        let url = format!("https://picsum.photos/500?v={}", n + 1);
        if review_images
            .create_within_limit(review.id, &url, MAX_REVIEW_IMAGES)
            .await?
            .is_some()
        {
            report.review_images += 1;
        }
    }

    for &(guest, spot, offset, nights) in &BOOKINGS {
        let start = options.today + Duration::days(offset);
        let end = start + Duration::days(nights);
        match bookings
            .create_booking(spot_ids[spot], user_ids[guest], start, end)
            .await?
        {
            BookingWrite::Saved(_) => report.bookings += 1,
            BookingWrite::Conflict => bail!("demo booking {} to {} conflicts", start, end),
        }
    }

    log::info!("Seeded demo data: {:?}", report);
    Ok(report)
}
