// crates/tenant-dispatch-core/tests/membership_filter.rs
// ============================================================================
// Module: Membership Filter Tests
// Description: Property tests for the tenant view Bloom filter.
// ============================================================================
//! ## Overview
//! Validates that added keys are never reported absent and that the observed
//! false-positive rate stays near the sizing target.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use proptest::prelude::*;
use tenant_dispatch_core::MembershipFilter;
use tenant_dispatch_core::TENANT_FILTER_FALSE_POSITIVE_RATE;
use tenant_dispatch_core::TableName;
use tenant_dispatch_core::TenantId;
use tenant_dispatch_core::TenantViewKey;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Builds a key for `tenant` on `view`.
fn key(tenant: &str, view: &str) -> TenantViewKey {
    TenantViewKey::new(TenantId::new(tenant), TableName::new(view))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn tenant_and_view_both_distinguish_keys() {
    let mut filter = MembershipFilter::new(100, TENANT_FILTER_FALSE_POSITIVE_RATE).unwrap();
    filter.put(&key("tenant-a", "VIEW_ONE"));

    assert!(filter.might_contain(&key("tenant-a", "VIEW_ONE")));
    assert!(!filter.might_contain(&key("tenant-a", "VIEW_TWO")));
    assert!(!filter.might_contain(&key("tenant-b", "VIEW_ONE")));
}

#[test]
fn field_boundaries_do_not_collide() {
    let mut filter = MembershipFilter::new(100, TENANT_FILTER_FALSE_POSITIVE_RATE).unwrap();
    filter.put(&key("ab", "c"));

    assert!(!filter.might_contain(&key("a", "bc")));
}

#[test]
fn observed_false_positives_stay_near_target_at_capacity() {
    let mut filter = MembershipFilter::new(2_000, 0.001).unwrap();
    for tenant in 0 .. 2_000 {
        filter.put(&key(&format!("member-{tenant}"), "VIEW"));
    }
    let false_positives = (0 .. 50_000)
        .filter(|candidate| filter.might_contain(&key(&format!("other-{candidate}"), "VIEW")))
        .count();

    assert!(false_positives < 500, "observed {false_positives} false positives");
}

#[test]
fn configured_rate_holds_for_tenant_scale_filters() {
    let mut filter = MembershipFilter::new(20_000, TENANT_FILTER_FALSE_POSITIVE_RATE).unwrap();
    for tenant in 0 .. 20_000 {
        filter.put(&key(&format!("member-{tenant}"), "VIEW"));
    }
    let false_positives = (0 .. 3_000_000)
        .filter(|candidate| filter.might_contain(&key(&format!("other-{candidate}"), "VIEW")))
        .count();

    assert_eq!(filter.stats().num_hashes, 23);
    assert!(false_positives <= 5, "observed {false_positives} false positives");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn added_keys_are_never_reported_absent(
        tenants in prop::collection::vec("[a-z0-9]{1,12}", 1 .. 200),
        view in "[A-Z_]{1,16}",
    ) {
        let mut filter =
            MembershipFilter::new(200, TENANT_FILTER_FALSE_POSITIVE_RATE).unwrap();
        for tenant in &tenants {
            filter.put(&key(tenant, &view));
        }
        for tenant in &tenants {
            prop_assert!(filter.might_contain(&key(tenant, &view)));
        }
    }

    #[test]
    fn bits_set_never_decrease(tenants in prop::collection::vec("[a-z]{1,8}", 1 .. 50)) {
        let mut filter = MembershipFilter::new(50, 0.01).unwrap();
        let mut previous = 0;
        for tenant in &tenants {
            filter.put(&key(tenant, "VIEW"));
            let bits_set = filter.stats().bits_set;
            prop_assert!(bits_set >= previous);
            previous = bits_set;
        }
    }
}
