mod common;

use booking_core::calendar::{
    build_calendar_grid, color_of, days_in_month, first_weekday_of_month, is_leap_year,
};
use booking_core::errors::{DayConflict, LedgerError};
use booking_core::ledger::{ExpenseCategory, StayRange};

use common::{julio, memory_manager};

#[test]
fn days_in_month_follows_gregorian_rules() {
    assert_eq!(days_in_month("Febrero", 2024), 29);
    assert_eq!(days_in_month("Febrero", 2023), 28);
    assert_eq!(days_in_month("Febrero", 2000), 29);
    assert_eq!(days_in_month("Febrero", 1900), 28);
    assert_eq!(days_in_month("Febrero", 2100), 28);
    assert_eq!(days_in_month("Abril", 2025), 30);
    assert_eq!(days_in_month("Diciembre", 2025), 31);
    assert!(is_leap_year(2400));
    assert!(!is_leap_year(2200));
}

#[test]
fn unknown_month_falls_back_instead_of_failing() {
    assert_eq!(days_in_month("Smarch", 2025), 31);
    assert_eq!(first_weekday_of_month("Smarch", 2025), 0);
}

#[test]
fn january_2024_grid_has_one_leading_slot() {
    assert_eq!(first_weekday_of_month("Enero", 2024), 1);
    let grid = build_calendar_grid("Enero", 2024);
    assert_eq!(grid.len(), 32);
    assert_eq!(grid[0], None);
    assert_eq!(grid[1], Some(1));
    assert_eq!(grid[31], Some(31));
    assert_eq!(grid, build_calendar_grid("Enero", 2024));
}

#[test]
fn conflicting_create_lists_every_day_and_leaves_state_untouched() {
    let mut manager = memory_manager();
    manager
        .create_booking(&julio("Depto 1", 5, 10), "Ana", Some(400.0))
        .expect("first booking");
    let before = manager.day_ledger("Depto 1", "Julio", 2025).clone();

    let err = manager
        .create_booking(&julio("Depto 1", 8, 12), "Beto", None)
        .expect_err("overlap must be rejected");

    let expected: Vec<DayConflict> = (8..=10)
        .map(|day| DayConflict {
            day,
            client: "Ana".into(),
        })
        .collect();
    assert_eq!(err.conflicts(), expected.as_slice());
    assert_eq!(
        err.to_string(),
        "days already booked: day 8 (Ana), day 9 (Ana), day 10 (Ana)"
    );
    assert_eq!(manager.day_ledger("Depto 1", "Julio", 2025), &before);
}

#[test]
fn invalid_ranges_are_validation_errors() {
    let mut manager = memory_manager();
    for (stay, client) in [
        (julio("Casa", 10, 5), "Ana"),
        (julio("Casa", 0, 3), "Ana"),
        (julio("Casa", 30, 32), "Ana"),
        (julio("Casa", 1, 2), "   "),
    ] {
        let err = manager
            .create_booking(&stay, client, None)
            .expect_err("invalid input");
        assert!(matches!(err, LedgerError::Validation(_)), "{err:?}");
    }
    assert!(manager.group_by_client("Julio", 2025).is_empty());
}

#[test]
fn moving_onto_own_days_extends_the_stay() {
    let mut manager = memory_manager();
    let created = manager
        .create_booking(&julio("Depto 2", 5, 10), "Ana", Some(300.0))
        .expect("create");

    let moved = manager
        .move_booking("Ana", &julio("Depto 2", 5, 12))
        .expect("self overlap is allowed");
    assert_eq!(moved.nights(), 8);

    let days = manager.day_ledger("Depto 2", "Julio", 2025);
    for day in 5..=12 {
        let booking = days.get(day).expect("day occupied");
        assert_eq!(booking.client, "Ana");
        assert_eq!(booking.amount_paid, 300.0);
        assert_eq!(booking.color, created.color);
    }
    assert_eq!(days.len(), 8);
}

#[test]
fn rejected_move_keeps_source_intact() {
    let mut manager = memory_manager();
    manager
        .create_booking(&julio("Depto 1", 1, 4), "Ana", Some(200.0))
        .expect("ana");
    manager
        .create_booking(&julio("Casa", 10, 15), "Beto", Some(500.0))
        .expect("beto");
    let snapshot = manager.reservations().clone();

    let err = manager
        .move_booking("Ana", &julio("Casa", 12, 20))
        .expect_err("destination held by Beto");
    assert_eq!(err.conflicts().len(), 4);
    assert_eq!(manager.reservations(), &snapshot);
}

#[test]
fn move_across_properties_frees_the_source() {
    let mut manager = memory_manager();
    manager
        .create_booking(&julio("Depto 1", 1, 4), "Ana", Some(200.0))
        .expect("ana");
    manager
        .move_booking("Ana", &julio("Depto 3", 20, 22))
        .expect("move");

    assert!(manager.day_ledger("Depto 1", "Julio", 2025).is_empty());
    let stay = &manager.group_by_client("Julio", 2025)["Ana"];
    assert_eq!(stay.days.iter().copied().collect::<Vec<_>>(), vec![20, 21, 22]);
    assert_eq!(stay.total, 200.0);
    assert_eq!(stay.primary_property(), Some("Depto 3"));
}

#[test]
fn amount_propagates_across_properties() {
    let mut manager = memory_manager();
    manager
        .create_booking(&julio("Depto 1", 1, 3), "Ana", Some(100.0))
        .expect("first");
    manager
        .create_booking(&julio("Casa", 20, 25), "Ana", Some(100.0))
        .expect("second");

    let updated = manager.set_client_amount("Ana", "Julio", 2025, 500.0);
    assert_eq!(updated, 9);

    let grouped = manager.group_by_client("Julio", 2025);
    let ana = &grouped["Ana"];
    assert_eq!(ana.total, 500.0);
    assert_eq!(ana.properties.len(), 2);
    assert_eq!((ana.first_day, ana.last_day), (1, 25));
    assert!(!ana.is_contiguous());
}

#[test]
fn delete_is_global_for_the_month_and_lenient() {
    let mut manager = memory_manager();
    manager
        .create_booking(&julio("Depto 1", 1, 3), "Ana", None)
        .expect("first");
    manager
        .create_booking(&julio("Casa", 5, 6), "Ana", None)
        .expect("second");
    manager
        .create_booking(&StayRange::new("Casa", "Agosto", 2025, 1, 2), "Ana", None)
        .expect("other month");

    assert_eq!(manager.delete_client("Julio", 2025, "Ana"), 5);
    assert_eq!(manager.delete_client("Julio", 2025, "Nadie"), 0);
    assert!(manager.group_by_client("Julio", 2025).is_empty());
    assert!(manager.group_by_client("Agosto", 2025).contains_key("Ana"));
}

#[test]
fn client_names_are_not_normalized() {
    let mut manager = memory_manager();
    manager
        .create_booking(&julio("Casa", 1, 2), "ana", None)
        .expect("lowercase");
    let err = manager
        .create_booking(&julio("Casa", 2, 3), "Ana", None)
        .expect_err("different client");
    assert_eq!(
        err.conflicts(),
        &[DayConflict {
            day: 2,
            client: "ana".into()
        }]
    );
}

#[test]
fn color_is_deterministic() {
    let mut manager = memory_manager();
    let receipt = manager
        .create_booking(&julio("Casa", 1, 1), "Ana", None)
        .expect("create");
    assert_eq!(receipt.color, color_of("Ana"));
    assert_eq!(color_of("Ana"), color_of("Ana"));
}

#[test]
fn never_written_month_reads_as_zeroed_expenses() {
    let manager = memory_manager();
    let expenses = manager.expenses("Marzo", 2030);
    assert_eq!(expenses.iter().count(), 12);
    assert!(expenses.iter().all(|(_, amount)| amount == 0.0));
    assert_eq!(expenses.get(ExpenseCategory::Marketing), 0.0);
}
