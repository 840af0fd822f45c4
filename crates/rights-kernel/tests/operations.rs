//! End-to-end behaviour of the six ledger operations.

use rights_kernel::keeper::KeeperError;
use rights_kernel::{BasicConfig, Holder, ItemSetConfig, KernelError, Mint};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

#[test]
fn test_withdraw_from_minted_purse() {
    init_tracing();
    let mint = Mint::new(BasicConfig, "moola");
    let assay = mint.assay();
    let purse = mint.mint(1000, None).unwrap();

    let payment = purse.withdraw(&assay.make_units(7).unwrap(), None).unwrap();

    assert_eq!(*purse.balance().unwrap().extent(), 993);
    assert_eq!(*payment.balance().unwrap().extent(), 7);
    assert_eq!(*mint.outstanding().unwrap().extent(), 1000);
}

#[test]
fn test_split_into_ten() {
    let mint = Mint::new(BasicConfig, "moola");
    let assay = mint.assay();
    let payment = mint.mint(100, None).unwrap().withdraw_all(None).unwrap();
    let tens: Vec<_> = (0..10).map(|_| assay.make_units(10).unwrap()).collect();

    let parts = assay.split(&payment, &tens, None).unwrap();

    assert_eq!(parts.len(), 10);
    for part in &parts {
        assert_eq!(*part.balance().unwrap().extent(), 10);
    }
    assert!(payment.balance().unwrap_err().is_stale_handle());
    assert_eq!(mint.live_counts().unwrap(), (1, 10));
}

#[test]
fn test_split_then_combine_round_trip() {
    let mint = Mint::new(BasicConfig, "moola");
    let assay = mint.assay();
    let payment = mint.mint(50, None).unwrap().withdraw_all(None).unwrap();

    let parts = assay
        .split(
            &payment,
            &[assay.make_units(20).unwrap(), assay.make_units(30).unwrap()],
            Some(&["a", "b"][..]),
        )
        .unwrap();
    assert_eq!(parts[0].name(), "a");
    assert_eq!(parts[1].name(), "b");

    let combined = assay.combine(&parts, Some("whole")).unwrap();
    assert_eq!(*combined.balance().unwrap().extent(), 50);
    assert!(parts.iter().all(|p| p.balance().unwrap_err().is_stale_handle()));
}

#[test]
fn test_consumed_payment_fails_everywhere() {
    let mint = Mint::new(BasicConfig, "moola");
    let assay = mint.assay();
    let purse = mint.mint(10, None).unwrap();
    let payment = purse.withdraw_all(None).unwrap();
    assay.claim_all(&payment, None).unwrap();

    let ten = assay.make_units(10).unwrap();
    let failures = [
        payment.balance().map(|_| ()),
        purse.deposit_all(&payment).map(|_| ()),
        purse.deposit_exactly(&ten, &payment).map(|_| ()),
        assay.split(&payment, &[ten.clone()], None).map(|_| ()),
        assay.combine(&[payment.clone()], None).map(|_| ()),
        assay.claim_all(&payment, None).map(|_| ()),
        assay.claim_exactly(&ten, &payment, None).map(|_| ()),
        assay.burn_all(&payment).map(|_| ()),
        assay.burn_exactly(&ten, &payment).map(|_| ()),
    ];
    for result in failures {
        assert!(result.unwrap_err().is_stale_handle());
    }
}

#[test]
fn test_foreign_units_rejected() {
    let a = Mint::new(BasicConfig, "moola");
    let b = Mint::new(BasicConfig, "moola");
    let units_a = a.assay().make_units(3).unwrap();

    assert!(matches!(b.assay().coerce(&units_a), Err(KernelError::Core(_))));

    let purse_b = b.mint(10, None).unwrap();
    assert!(matches!(
        purse_b.withdraw(&units_a, None),
        Err(KernelError::Core(_))
    ));
    assert_eq!(*purse_b.balance().unwrap().extent(), 10);
}

#[test]
fn test_foreign_payment_rejected_by_purse() {
    let a = Mint::new(BasicConfig, "moola");
    let b = Mint::new(BasicConfig, "moola");
    let payment_a = a.mint(3, None).unwrap().withdraw_all(None).unwrap();
    let purse_b = b.mint(0, None).unwrap();

    let err = purse_b.deposit_all(&payment_a).unwrap_err();
    assert!(matches!(err, KernelError::ForeignAsset(_)));
    assert_eq!(*payment_a.balance().unwrap().extent(), 3);
}

#[test]
fn test_descriptor_reenters_only_through_assay() {
    let mint = Mint::new(BasicConfig, "moola");
    let assay = mint.assay();
    let units = assay.make_units(42).unwrap();

    let json = serde_json::to_string(&units.to_descriptor()).unwrap();
    let descriptor = serde_json::from_str(&json).unwrap();
    let back = assay.coerce_descriptor(descriptor).unwrap();
    assert!(assay.unit_ops().equals(&back, &units).unwrap());

    let other = Mint::new(BasicConfig, "moola");
    let descriptor = serde_json::from_str(&json).unwrap();
    assert!(other.assay().coerce_descriptor(descriptor).is_err());
}

#[test]
fn test_revocation_of_one_item() {
    init_tracing();
    let mint = Mint::new(ItemSetConfig::<(u32, u32)>::new(), "pixels");
    let first = mint.mint(vec![(1, 4)], None).unwrap();
    let second = mint.mint(vec![(2, 2)], None).unwrap();

    let destroyed = mint
        .destroy(&mint.assay().make_units(vec![(1, 4)]).unwrap())
        .unwrap();

    assert_eq!(destroyed.extent(), &vec![(1, 4)]);
    assert!(first.balance().unwrap().extent().is_empty());
    assert_eq!(second.balance().unwrap().extent(), &vec![(2, 2)]);
}

#[test]
fn test_revocation_follows_payments() {
    let mint = Mint::new(ItemSetConfig::<u32>::new(), "tickets");
    let assay = mint.assay();
    let purse = mint.mint(vec![1, 2, 3, 4], None).unwrap();
    let payment = purse.withdraw(&assay.make_units(vec![2, 3]).unwrap(), None).unwrap();
    let parts = assay
        .split(
            &payment,
            &[assay.make_units(vec![2]).unwrap(), assay.make_units(vec![3]).unwrap()],
            None,
        )
        .unwrap();

    assert_eq!(mint.holder_of(&3).unwrap(), Some(Holder::Payment(parts[1].id())));

    mint.destroy(&assay.make_units(vec![1, 3]).unwrap()).unwrap();

    assert_eq!(purse.balance().unwrap().extent(), &vec![4]);
    assert_eq!(parts[0].balance().unwrap().extent(), &vec![2]);
    assert!(parts[1].balance().unwrap().extent().is_empty());
    assert_eq!(mint.holder_of(&3).unwrap(), None);
}

#[test]
fn test_minting_held_item_rejected() {
    init_tracing();
    let mint = Mint::new(ItemSetConfig::<u32>::new(), "tickets");
    let assay = mint.assay();
    let first = mint.mint(vec![7], None).unwrap();

    let err = mint.mint(vec![7], None).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Keeper(KeeperError::ElementHeld(Holder::Purse(id))) if id == first.id()
    ));
    assert!(err.is_validation());
    assert_eq!(mint.live_counts().unwrap(), (1, 0));

    // An item can be issued again once revoked.
    mint.destroy(&assay.make_units(vec![7]).unwrap()).unwrap();
    assert!(first.balance().unwrap().extent().is_empty());
    assert_eq!(mint.holder_of(&7).unwrap(), None);

    let second = mint.mint(vec![7, 8], None).unwrap();
    assert_eq!(mint.holder_of(&7).unwrap(), Some(Holder::Purse(second.id())));
}

#[test]
fn test_item_set_withdraw_deposit_round_trip() {
    let mint = Mint::new(ItemSetConfig::<u32>::new(), "tickets");
    let assay = mint.assay();
    let purse = mint.mint(vec![1, 2], None).unwrap();
    let payment = purse.withdraw(&assay.make_units(vec![2]).unwrap(), None).unwrap();
    purse.deposit_all(&payment).unwrap();
    assert_eq!(purse.balance().unwrap().extent(), &vec![1, 2]);
}
