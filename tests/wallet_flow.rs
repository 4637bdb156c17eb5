//! End-to-end ledger behavior over the real services and an in-memory
//! SQLite store.

use sqlx::sqlite::SqlitePoolOptions;
use swopnet_backend::config::WalletConfig;
use swopnet_backend::database::{DbPool, run_migrations};
use swopnet_backend::error::AppError;
use swopnet_backend::models::*;
use swopnet_backend::services::{
    TopUpService, TransferService, VoucherService, WalletService, ledger,
};

/// Single connection: writes serialize the same way the production WAL
/// writer does, so racing operations contend on the guarded UPDATE.
async fn setup_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    run_migrations(&pool).await.expect("run migrations");
    pool
}

fn services(pool: &DbPool) -> (WalletService, TransferService, VoucherService, TopUpService) {
    (
        WalletService::new(pool.clone()),
        TransferService::new(pool.clone(), &WalletConfig::default()),
        VoucherService::new(pool.clone()),
        TopUpService::new(pool.clone()),
    )
}

async fn create_account(
    wallet: &WalletService,
    email: &str,
    phone: Option<&str>,
    opening_balance: i64,
) -> Account {
    wallet
        .create_account(CreateAccountRequest {
            email: email.to_string(),
            phone: phone.map(str::to_string),
            opening_balance,
        })
        .await
        .expect("create account")
}

fn transfer_request(recipient: &str, amount: i64) -> TransferRequest {
    TransferRequest {
        recipient: recipient.to_string(),
        amount,
        reference: None,
        description: None,
    }
}

#[tokio::test]
async fn balance_of_unknown_account_fails() {
    let pool = setup_pool().await;
    let (wallet, _, _, _) = services(&pool);

    let err = wallet.get_balance("no-such-account").await.unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound));
}

#[tokio::test]
async fn transfer_debits_amount_and_credits_amount_minus_fee() {
    let pool = setup_pool().await;
    let (wallet, transfers, _, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 200_00).await;
    let bob = create_account(&wallet, "bob@example.com", None, 0).await;

    let response = transfers
        .transfer(&alice.id, transfer_request("bob@example.com", 100_00))
        .await
        .unwrap();

    // Sender pays exactly the amount; the fee comes out of the credit.
    assert_eq!(response.amount, 100_00);
    assert_eq!(response.fee, 5_00);
    assert_eq!(response.recipient_credit, 95_00);
    assert_eq!(response.new_balance, 100_00);
    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 100_00);
    assert_eq!(wallet.get_balance(&bob.id).await.unwrap(), 95_00);

    // Both legs are on the ledger with balance snapshots.
    let query = TransactionQuery {
        page: None,
        per_page: None,
    };
    let out = wallet.get_transactions(&alice.id, &query).await.unwrap();
    let leg = &out.data[0];
    assert_eq!(leg.tx_type, TxType::TransferOut);
    assert_eq!(leg.amount, 100_00);
    assert_eq!(leg.fee, 5_00);
    assert_eq!(leg.balance_after, Some(100_00));
    assert_eq!(leg.status, TxStatus::Completed);
    assert_eq!(leg.related_user_id.as_deref(), Some(bob.id.as_str()));

    let inn = wallet.get_transactions(&bob.id, &query).await.unwrap();
    let leg = &inn.data[0];
    assert_eq!(leg.tx_type, TxType::TransferIn);
    assert_eq!(leg.amount, 95_00);
    assert_eq!(leg.balance_after, Some(95_00));
}

#[tokio::test]
async fn transfer_resolves_recipient_by_phone() {
    let pool = setup_pool().await;
    let (wallet, transfers, _, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 50_00).await;
    let bob = create_account(&wallet, "bob@example.com", Some("0812345678"), 0).await;

    // Loosely formatted local number still resolves to the same account.
    transfers
        .transfer(&alice.id, transfer_request("081 234 5678", 20_00))
        .await
        .unwrap();

    assert_eq!(wallet.get_balance(&bob.id).await.unwrap(), 19_00);
}

#[tokio::test]
async fn transfer_rejects_bad_amounts() {
    let pool = setup_pool().await;
    let (wallet, transfers, _, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 100_00).await;
    create_account(&wallet, "bob@example.com", None, 0).await;

    for amount in [0, -100, 4_99] {
        let err = transfers
            .transfer(&alice.id, transfer_request("bob@example.com", amount))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount(_)), "amount {amount}");
    }
    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 100_00);
}

#[tokio::test]
async fn transfer_rejects_unknown_and_self_recipients() {
    let pool = setup_pool().await;
    let (wallet, transfers, _, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 100_00).await;

    let err = transfers
        .transfer(&alice.id, transfer_request("ghost@example.com", 10_00))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::RecipientNotFound));

    let err = transfers
        .transfer(&alice.id, transfer_request("alice@example.com", 10_00))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SelfTransferNotAllowed));

    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 100_00);
}

#[tokio::test]
async fn overdrawing_transfer_fails_and_leaves_both_balances_unchanged() {
    let pool = setup_pool().await;
    let (wallet, transfers, _, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 50_00).await;
    let bob = create_account(&wallet, "bob@example.com", None, 10_00).await;

    let err = transfers
        .transfer(&alice.id, transfer_request("bob@example.com", 80_00))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientFunds));

    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 50_00);
    assert_eq!(wallet.get_balance(&bob.id).await.unwrap(), 10_00);
}

#[tokio::test]
async fn transfer_with_same_reference_applies_once() {
    let pool = setup_pool().await;
    let (wallet, transfers, _, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 100_00).await;
    let bob = create_account(&wallet, "bob@example.com", None, 0).await;

    let request = TransferRequest {
        recipient: "bob@example.com".to_string(),
        amount: 30_00,
        reference: Some("client-retry-1".to_string()),
        description: None,
    };

    let first = transfers
        .transfer(
            &alice.id,
            TransferRequest {
                recipient: request.recipient.clone(),
                amount: request.amount,
                reference: request.reference.clone(),
                description: None,
            },
        )
        .await
        .unwrap();
    let second = transfers.transfer(&alice.id, request).await.unwrap();

    // The retry replays the stored outcome; no second debit happened.
    assert_eq!(first.transfer_out_id, second.transfer_out_id);
    assert_eq!(first.new_balance, second.new_balance);
    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 70_00);
    assert_eq!(wallet.get_balance(&bob.id).await.unwrap(), 28_50);
}

#[tokio::test]
async fn dropped_transaction_rolls_back_the_debit() {
    let pool = setup_pool().await;
    let (wallet, _, _, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 100_00).await;

    // Debit inside an explicit transaction, then abandon it: the failure
    // path between a transfer's two legs.
    let mut tx = pool.begin().await.unwrap();
    let (mid_balance, _) = ledger::apply_delta(
        &mut tx,
        &alice.id,
        -60_00,
        TxType::TransferOut,
        ledger::TxMeta::default(),
    )
    .await
    .unwrap();
    assert_eq!(mid_balance, 40_00);
    drop(tx);

    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 100_00);
    let query = TransactionQuery {
        page: None,
        per_page: None,
    };
    let history = wallet.get_transactions(&alice.id, &query).await.unwrap();
    assert_eq!(history.total, 0);
}

#[tokio::test]
async fn concurrent_transfers_cannot_both_drain_the_balance() {
    let pool = setup_pool().await;
    let (wallet, transfers, _, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 100_00).await;
    create_account(&wallet, "bob@example.com", None, 0).await;
    create_account(&wallet, "carol@example.com", None, 0).await;

    let (t1, t2) = (transfers.clone(), transfers.clone());
    let (a1, a2) = (alice.id.clone(), alice.id.clone());
    let first =
        tokio::spawn(async move { t1.transfer(&a1, transfer_request("bob@example.com", 100_00)).await });
    let second = tokio::spawn(async move {
        t2.transfer(&a2, transfer_request("carol@example.com", 100_00)).await
    });

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one racing transfer may win");
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(AppError::InsufficientFunds))));
    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 0);
}

#[tokio::test]
async fn voucher_redeems_exactly_once() {
    let pool = setup_pool().await;
    let (wallet, _, vouchers, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 0).await;

    let issued = vouchers
        .issue(IssueVouchersRequest {
            amount: 50_00,
            count: None,
        })
        .await
        .unwrap();
    let code = issued[0].code.clone();

    let redeemed = vouchers
        .redeem(
            &alice.id,
            RedeemVoucherRequest { code: code.clone() },
        )
        .await
        .unwrap();
    assert_eq!(redeemed.amount, 50_00);
    assert_eq!(redeemed.new_balance, 50_00);

    let err = vouchers
        .redeem(&alice.id, RedeemVoucherRequest { code })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::VoucherAlreadyRedeemed));
    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 50_00);
}

#[tokio::test]
async fn voucher_code_is_normalized_before_lookup() {
    let pool = setup_pool().await;
    let (wallet, _, vouchers, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 0).await;

    let issued = vouchers
        .issue(IssueVouchersRequest {
            amount: 25_00,
            count: Some(1),
        })
        .await
        .unwrap();

    // Same code with separators sprinkled in.
    let code = issued[0].code.clone();
    let decorated = format!("{}-{}", &code[..5], &code[5..]);
    let redeemed = vouchers
        .redeem(&alice.id, RedeemVoucherRequest { code: decorated })
        .await
        .unwrap();
    assert_eq!(redeemed.amount, 25_00);
}

#[tokio::test]
async fn unknown_voucher_is_rejected() {
    let pool = setup_pool().await;
    let (wallet, _, vouchers, _) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 0).await;

    let err = vouchers
        .redeem(
            &alice.id,
            RedeemVoucherRequest {
                code: "0000000000".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::VoucherNotFound));

    let err = vouchers
        .redeem(&alice.id, RedeemVoucherRequest { code: " - ".to_string() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn topup_moves_no_money_until_approved() {
    let pool = setup_pool().await;
    let (wallet, _, _, topups) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 10_00).await;

    let submitted = topups
        .submit(
            &alice.id,
            SubmitTopUpRequest {
                amount: 100_00,
                bank: "Bank Windhoek".to_string(),
                receipt_url: "https://cdn.example.com/receipts/abc.jpg".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(submitted.status, TopUpStatus::Pending);

    // Submission queues a pending ledger row but the balance is untouched.
    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 10_00);
    let query = TransactionQuery {
        page: None,
        per_page: None,
    };
    let history = wallet.get_transactions(&alice.id, &query).await.unwrap();
    assert_eq!(history.data[0].tx_type, TxType::Topup);
    assert_eq!(history.data[0].status, TxStatus::Pending);
    assert_eq!(history.data[0].balance_after, None);

    let resolved = topups.approve(&submitted.id).await.unwrap();
    assert_eq!(resolved.status, TopUpStatus::Approved);
    assert_eq!(resolved.new_balance, Some(110_00));
    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 110_00);

    let history = wallet.get_transactions(&alice.id, &query).await.unwrap();
    assert_eq!(history.data[0].status, TxStatus::Completed);
    assert_eq!(history.data[0].balance_after, Some(110_00));

    // Resolution is final.
    let err = topups.approve(&submitted.id).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyResolved));
}

#[tokio::test]
async fn rejected_topup_never_credits_and_cannot_be_approved() {
    let pool = setup_pool().await;
    let (wallet, _, _, topups) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 10_00).await;

    let submitted = topups
        .submit(
            &alice.id,
            SubmitTopUpRequest {
                amount: 100_00,
                bank: "FNB Namibia".to_string(),
                receipt_url: "https://cdn.example.com/receipts/def.jpg".to_string(),
            },
        )
        .await
        .unwrap();

    let resolved = topups.reject(&submitted.id).await.unwrap();
    assert_eq!(resolved.status, TopUpStatus::Rejected);
    assert_eq!(resolved.new_balance, None);
    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 10_00);

    let err = topups.approve(&submitted.id).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyResolved));
    assert_eq!(wallet.get_balance(&alice.id).await.unwrap(), 10_00);

    let query = TransactionQuery {
        page: None,
        per_page: None,
    };
    let history = wallet.get_transactions(&alice.id, &query).await.unwrap();
    assert_eq!(history.data[0].status, TxStatus::Failed);
    assert_eq!(history.data[0].balance_after, None);
}

#[tokio::test]
async fn pending_topups_appear_in_the_admin_queue() {
    let pool = setup_pool().await;
    let (wallet, _, _, topups) = services(&pool);
    let alice = create_account(&wallet, "alice@example.com", None, 0).await;

    for (amount, bank) in [(50_00, "Bank Windhoek"), (75_00, "Standard Bank")] {
        topups
            .submit(
                &alice.id,
                SubmitTopUpRequest {
                    amount,
                    bank: bank.to_string(),
                    receipt_url: "https://cdn.example.com/receipts/x.jpg".to_string(),
                },
            )
            .await
            .unwrap();
    }

    let queue = topups
        .list_pending(&TopUpQuery {
            page: None,
            per_page: None,
        })
        .await
        .unwrap();
    assert_eq!(queue.total, 2);
    assert_eq!(queue.data[0].amount, 50_00);

    topups.approve(&queue.data[0].id).await.unwrap();
    let queue = topups
        .list_pending(&TopUpQuery {
            page: None,
            per_page: None,
        })
        .await
        .unwrap();
    assert_eq!(queue.total, 1);
}

#[tokio::test]
async fn duplicate_email_or_phone_is_rejected() {
    let pool = setup_pool().await;
    let (wallet, _, _, _) = services(&pool);
    create_account(&wallet, "alice@example.com", Some("0812345678"), 0).await;

    let err = wallet
        .create_account(CreateAccountRequest {
            email: "alice@example.com".to_string(),
            phone: None,
            opening_balance: 0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = wallet
        .create_account(CreateAccountRequest {
            email: "other@example.com".to_string(),
            phone: Some("+264812345678".to_string()),
            opening_balance: 0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}
