//! PostgreSQL adapter tests
//!
//! These start a PostgreSQL container and are ignored by default:
//! `cargo test -p infra_db -- --ignored`

use std::sync::Arc;

use chrono::Duration;
use core_kernel::{BusinessId, PortError};
use domain_claims::{ClaimService, ClaimStatus, ClaimsPort, NewMessage, TimelineKind};
use domain_warranty::{ExtensionPlan, WarrantyPort, WarrantyService};
use infra_db::{PostgresClaimsAdapter, PostgresWarrantyAdapter};
use test_utils::{
    assert_timeline_kinds, create_isolated_test_database, ActorFixtures, InputFixtures,
    TemporalFixtures, TestClaimBuilder, TestProductBuilder, TestRegistrationBuilder,
};

#[tokio::test]
#[ignore = "requires docker"]
async fn test_product_lookup_by_serial_prefix() {
    let db = create_isolated_test_database().await.unwrap();
    let port = PostgresWarrantyAdapter::new(db.pool().clone());

    let product = TestProductBuilder::new().build();
    port.insert_product(&product).await.unwrap();

    let found = port.find_product_by_serial_prefix("LPX1").await.unwrap();
    assert_eq!(found.map(|p| p.id), Some(product.id));
    assert!(port.find_product_by_serial_prefix("ZZZ9").await.unwrap().is_none());

    let listed = port.list_products(product.business_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(port.list_products(BusinessId::new()).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_duplicate_serial_is_conflict() {
    let db = create_isolated_test_database().await.unwrap();
    let port = PostgresWarrantyAdapter::new(db.pool().clone());

    let product = TestProductBuilder::new().build();
    port.insert_product(&product).await.unwrap();

    let first = TestRegistrationBuilder::new(&product).build();
    let second = TestRegistrationBuilder::new(&product).build();
    port.insert_registration(&first).await.unwrap();

    let err = port.insert_registration(&second).await.unwrap_err();
    assert!(matches!(err, PortError::Conflict { .. }));

    let stored = port
        .find_registration_by_serial(InputFixtures::LAPTOP_SERIAL)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.expiry_date, first.expiry_date);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_extension_moves_expiry_and_rejects_stale_write() {
    let db = create_isolated_test_database().await.unwrap();
    let port = Arc::new(PostgresWarrantyAdapter::new(db.pool().clone()));
    let service = WarrantyService::new(port.clone());

    let product = TestProductBuilder::new().build();
    port.insert_product(&product).await.unwrap();
    let customer = ActorFixtures::customer();
    let registration = TestRegistrationBuilder::new(&product)
        .for_customer(customer.customer_id().unwrap())
        .build();
    port.insert_registration(&registration).await.unwrap();

    let receipt = service
        .extend_warranty(
            &customer,
            registration.id,
            ExtensionPlan::Basic,
            TemporalFixtures::while_active(),
        )
        .await
        .unwrap();
    assert_eq!(receipt.extension.previous_expiry, TemporalFixtures::expiry_date());

    let stored = port.get_registration(registration.id).await.unwrap();
    assert_eq!(stored.expiry_date, receipt.extension.new_expiry);
    assert_eq!(port.registrations().find_extensions(registration.id.into()).await.unwrap().len(), 1);

    // Replaying against the old expiry must not double-extend
    let mut stale = registration.clone();
    let replay = domain_warranty::WarrantyExtension::apply(
        &mut stale,
        ExtensionPlan::Basic,
        TemporalFixtures::while_active(),
    )
    .unwrap();
    let err = port.record_extension(&stale, &replay).await.unwrap_err();
    assert!(matches!(err, PortError::Conflict { .. }));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_claim_lifecycle_persists_timeline() {
    let db = create_isolated_test_database().await.unwrap();
    let warranty = Arc::new(PostgresWarrantyAdapter::new(db.pool().clone()));
    let claims = Arc::new(PostgresClaimsAdapter::new(db.pool().clone()));
    let service = ClaimService::new(warranty.clone(), claims.clone());

    let business = ActorFixtures::business();
    let product = TestProductBuilder::new()
        .with_business(business.business_id().unwrap())
        .build();
    warranty.insert_product(&product).await.unwrap();

    let customer = ActorFixtures::customer();
    let registration = TestRegistrationBuilder::new(&product)
        .for_customer(customer.customer_id().unwrap())
        .build();
    warranty.insert_registration(&registration).await.unwrap();

    let now = TemporalFixtures::while_expiring();
    let claim = service
        .create_claim(&customer, InputFixtures::display_claim(product.id), now)
        .await
        .unwrap()
        .claim;
    assert_eq!(claim.status, ClaimStatus::Pending);

    service
        .update_claim_status(&business, claim.id, ClaimStatus::InProgress, now + Duration::hours(1))
        .await
        .unwrap();
    service
        .add_message(
            &customer,
            claim.id,
            NewMessage { content: "Any update?".to_string() },
            now + Duration::hours(2),
        )
        .await
        .unwrap();
    service
        .update_claim_status(&business, claim.id, ClaimStatus::Resolved, now + Duration::hours(3))
        .await
        .unwrap();

    let timeline = claims.timeline(claim.id).await.unwrap();
    assert_timeline_kinds(
        &timeline,
        &[
            TimelineKind::Created,
            TimelineKind::StatusChange,
            TimelineKind::Message,
            TimelineKind::StatusChange,
        ],
    );
    assert_eq!(claims.get_claim(claim.id).await.unwrap().status, ClaimStatus::Resolved);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_status_write_against_stale_status_is_conflict() {
    let db = create_isolated_test_database().await.unwrap();
    let warranty = PostgresWarrantyAdapter::new(db.pool().clone());
    let claims = PostgresClaimsAdapter::new(db.pool().clone());

    let product = TestProductBuilder::new().build();
    warranty.insert_product(&product).await.unwrap();
    let registration = TestRegistrationBuilder::new(&product).build();
    warranty.insert_registration(&registration).await.unwrap();

    let mut claim = TestClaimBuilder::new(&registration).build();
    let created = domain_claims::TimelineEntry::created(claim.id, claim.created_at);
    claims.insert_claim(&claim, &created).await.unwrap();

    let now = TemporalFixtures::while_active();
    let mut racer = claim.clone();
    let entry = racer.transition(ClaimStatus::Rejected, now).unwrap();
    claims.apply_status_change(&racer, ClaimStatus::Pending, &entry).await.unwrap();

    let entry = claim.transition(ClaimStatus::InProgress, now).unwrap();
    let err = claims
        .apply_status_change(&claim, ClaimStatus::Pending, &entry)
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Conflict { .. }));

    // The losing write left no timeline entry behind
    assert_eq!(claims.timeline(claim.id).await.unwrap().len(), 2);
}
