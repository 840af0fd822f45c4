//! Deposits of payments that arrive later.

use rights_kernel::{BasicConfig, KernelError, Mint, Payment};
use tokio::sync::oneshot;

type Delivery = oneshot::Receiver<Payment<BasicConfig>>;

async fn delivered(rx: Delivery) -> rights_kernel::Result<Payment<BasicConfig>> {
    rx.await
        .map_err(|e| KernelError::Rejected(e.to_string()))
}

#[tokio::test]
async fn test_eventual_deposit_waits_for_payment() -> anyhow::Result<()> {
    let mint = Mint::new(BasicConfig, "moola");
    let assay = mint.assay();
    let source = mint.mint(20, None)?;
    let target = assay.make_empty_purse(None)?;

    let (tx, rx) = oneshot::channel();
    let sender = {
        let source = source.clone();
        tokio::spawn(async move {
            let payment = source.withdraw_all(None).unwrap();
            let _ = tx.send(payment);
        })
    };

    let deposited = target.deposit_all_eventual(delivered(rx)).await?;
    sender.await?;

    assert_eq!(*deposited.extent(), 20);
    assert_eq!(*target.balance()?.extent(), 20);
    assert_eq!(*source.balance()?.extent(), 0);
    Ok(())
}

#[tokio::test]
async fn test_rejected_delivery_changes_nothing() {
    let mint = Mint::new(BasicConfig, "moola");
    let purse = mint.mint(5, None).unwrap();

    let (tx, rx) = oneshot::channel::<Payment<BasicConfig>>();
    drop(tx);

    let err = purse.deposit_all_eventual(delivered(rx)).await.unwrap_err();
    assert!(matches!(err, KernelError::Rejected(_)));
    assert_eq!(*purse.balance().unwrap().extent(), 5);
}

#[tokio::test]
async fn test_ledger_reread_after_await() {
    let mint = Mint::new(BasicConfig, "moola");
    let assay = mint.assay();
    let purse = mint.mint(10, None).unwrap();
    let four = assay.make_units(4).unwrap();
    let payment = purse.withdraw(&four, None).unwrap();

    let (tx, rx) = oneshot::channel();
    let pending = purse.deposit_exactly_eventual(&four, delivered(rx));

    // Someone else spends the payment while the deposit is waiting.
    let other = payment.clone();
    assay.burn_all(&other).unwrap();
    tx.send(payment).unwrap();

    let err = pending.await.unwrap_err();
    assert!(err.is_stale_handle());
    assert_eq!(*purse.balance().unwrap().extent(), 6);
}
