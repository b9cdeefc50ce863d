//! Common test utilities and a shared listing catalogue

#![allow(dead_code)]

use chrono::{Duration, Utc};
use listing_search::contract::{ListingSummary, SearchMode};
use uuid::Uuid;

/// Small but realistic marketplace catalogue covering both modes
pub fn catalogue() -> Vec<ListingSummary> {
    vec![
        ListingSummary {
            asking_price: Some(2_400_000.0),
            revenue: Some(5_000_000.0),
            ebitda: Some(620_000.0),
            verified: true,
            ..operational("Esso gas station on Highway 7", "fuel_auto", "gas_stations", "Vaughan, Ontario", 5)
        },
        ListingSummary {
            asking_price: Some(1_100_000.0),
            ebitda: Some(310_000.0),
            ..operational("Petro station with convenience store", "fuel_auto", "gas_stations", "Sudbury, Ontario", 2)
        },
        ListingSummary {
            asking_price: Some(900_000.0),
            ebitda: Some(280_000.0),
            ..operational("Car wash with detailing bays", "fuel_auto", "car_washes", "Calgary, Alberta", 10)
        },
        ListingSummary {
            asking_price: Some(450_000.0),
            revenue: Some(1_200_000.0),
            ebitda: Some(150_000.0),
            ..operational("Italian restaurant on Queen West", "food_beverage", "restaurants", "Toronto, Ontario", 1)
        },
        ListingSummary {
            asking_price: Some(1_800_000.0),
            mrr: Some(35_000.0),
            churn_rate: Some(3.5),
            verified: true,
            ..digital("B2B invoicing SaaS", "b2b_saas", 4)
        },
        ListingSummary {
            mrr: Some(8_000.0),
            churn_rate: Some(9.0),
            ..digital("Habit tracker mobile app", "mobile_apps", 6)
        },
        ListingSummary {
            mrr: Some(22_000.0),
            churn_rate: Some(12.0),
            ..digital("Developer tools SaaS", "b2b_saas", 3)
        },
    ]
}

fn operational(title: &str, category: &str, subcategory: &str, location: &str, age_days: i64) -> ListingSummary {
    ListingSummary {
        id: Uuid::new_v4(),
        title: title.to_string(),
        teaser: None,
        mode: SearchMode::Operational,
        category_code: category.to_string(),
        subcategory_code: Some(subcategory.to_string()),
        location: Some(location.to_string()),
        asking_price: None,
        revenue: None,
        ebitda: None,
        mrr: None,
        churn_rate: None,
        verified: false,
        created_at: Utc::now() - Duration::days(age_days),
    }
}

fn digital(title: &str, subcategory: &str, age_days: i64) -> ListingSummary {
    ListingSummary {
        mode: SearchMode::Digital,
        location: None,
        ..operational(title, "saas_software", subcategory, "", age_days)
    }
}

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}
