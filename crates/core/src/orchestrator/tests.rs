//! Orchestrator tests against the in-memory ledger and directory.

use std::sync::Arc;

use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use eusko_shared::types::{Amount, Currency, CustomFieldId, PostingId, UserId};

use crate::catalog::Catalog;
use crate::directory::MemberKind;
use crate::ledger::{AccountOwner, FieldValue, GeneratedTransfer, PaymentRequest};
use crate::operation::OperationError;
use crate::orchestrator::{
    BankTransferExchange, DigitalExchange, DigitalSubscription, NotesMovement, NotesTransport,
    PaperExchange, PaperReconversion, SubscriptionPayment, TransactionOrchestrator,
};
use crate::testing::{self, InMemoryDirectory, InMemoryLedger, RecordingNotifier};

const DESK: &str = "B001";
const INDIVIDUAL: &str = "E12345";
const BUSINESS: &str = "Z00042";

fn ledger() -> InMemoryLedger {
    InMemoryLedger::new()
        .with_desk(DESK)
        .with_user(INDIVIDUAL, "u-e12345", Some("adherents_utilisateurs"))
        .with_user(BUSINESS, "u-z00042", Some("adherents_prestataires"))
}

fn directory() -> InMemoryDirectory {
    let mut business = testing::member(BUSINESS, MemberKind::Business);
    business.company = Some("Txokoa".to_string());
    InMemoryDirectory::new()
        .with_member(testing::member(INDIVIDUAL, MemberKind::Individual))
        .with_member(business)
}

struct Fixture {
    ledger: Arc<InMemoryLedger>,
    notifier: Arc<RecordingNotifier>,
    orchestrator: TransactionOrchestrator,
}

fn fixture_with(ledger: InMemoryLedger, catalog: Catalog, notifier: RecordingNotifier) -> Fixture {
    let ledger = Arc::new(ledger);
    let notifier = Arc::new(notifier);
    let orchestrator = TransactionOrchestrator::new(
        ledger.clone(),
        Arc::new(directory()),
        Arc::new(catalog),
        notifier.clone(),
    );
    Fixture {
        ledger,
        notifier,
        orchestrator,
    }
}

fn fixture(ledger: InMemoryLedger) -> Fixture {
    fixture_with(ledger, testing::catalog(), RecordingNotifier::new())
}

fn field<'a>(request: &'a PaymentRequest, name: &str) -> Option<&'a FieldValue> {
    request.value(&CustomFieldId::new(name))
}

fn linked(user: &str) -> FieldValue {
    FieldValue::LinkedEntity(UserId::new(user))
}

fn user(id: &str) -> AccountOwner {
    AccountOwner::User(UserId::new(id))
}

fn paper_exchange(amount: Decimal, mode: &str) -> PaperExchange {
    PaperExchange {
        desk_login: DESK.to_string(),
        member_login: INDIVIDUAL.to_string(),
        amount: amount.into(),
        payment_mode: mode.to_string(),
    }
}

fn notes(member: &str, amount: Decimal) -> NotesMovement {
    NotesMovement {
        desk_login: DESK.to_string(),
        member_login: member.to_string(),
        amount: amount.into(),
    }
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_paper_exchange_submits_only_the_euro_leg() {
    let f = fixture(ledger());
    let report = f
        .orchestrator
        .exchange_paper(paper_exchange(dec!(20), "Euro-LIQ"))
        .await
        .unwrap();

    let performed = f.ledger.performed();
    assert_eq!(performed.len(), 1);
    let leg = &performed[0];
    assert_eq!(leg.payment_type.as_str(), "change_billets_versement_des_euro");
    assert_eq!(leg.currency.as_str(), "euro");
    assert_eq!(leg.from, AccountOwner::System);
    assert_eq!(leg.to, user(DESK));
    assert_eq!(field(leg, "adherent"), Some(&linked("u-e12345")));
    assert_eq!(
        field(leg, "mode_de_paiement"),
        Some(&FieldValue::Enumerated("especes".into()))
    );
    assert_eq!(leg.description, "Change billets - E12345 - Jon Etxeberri - Espèces");

    assert_eq!(
        report.generated,
        vec![GeneratedTransfer {
            payment_type: "change_billets_versement_des_eusko".into(),
            amount: dec!(20),
            currency: Currency::Eusko,
        }]
    );
}

#[tokio::test]
async fn test_paper_exchange_without_fee_rule_submits_counter_leg() {
    let mut catalog = testing::catalog();
    catalog.fee_rules.clear();
    let f = fixture_with(ledger(), catalog, RecordingNotifier::new());

    let report = f
        .orchestrator
        .exchange_paper(paper_exchange(dec!(20), "Euro-CHQ"))
        .await
        .unwrap();

    let performed = f.ledger.performed();
    assert_eq!(performed.len(), 2);
    assert_eq!(performed[1].payment_type.as_str(), "change_billets_versement_des_eusko");
    assert_eq!(performed[1].currency.as_str(), "eusko");
    assert_eq!(performed[1].from, user(DESK));
    assert_eq!(performed[1].to, AccountOwner::System);
    assert!(report.generated.is_empty());
}

#[tokio::test]
async fn test_paper_exchange_rejects_eusko_payment_mode() {
    let f = fixture(ledger());
    let err = f
        .orchestrator
        .exchange_paper(paper_exchange(dec!(20), "Eusko-LIQ"))
        .await
        .unwrap_err();
    assert!(matches!(err, OperationError::Validation(_)));
    assert!(f.ledger.calls().is_empty());
}

#[rstest]
#[case(dec!(-5))]
#[case(dec!(10.005))]
#[tokio::test]
async fn test_invalid_amount_submits_nothing(#[case] amount: Decimal) {
    let f = fixture(ledger());
    let err = f
        .orchestrator
        .exchange_paper(paper_exchange(amount, "Euro-LIQ"))
        .await
        .unwrap_err();
    assert!(matches!(err, OperationError::Validation(_)));
    assert!(err.nothing_happened());
    assert!(f.ledger.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_desk_is_not_found() {
    let f = fixture(InMemoryLedger::new().with_user(INDIVIDUAL, "u-e12345", None));
    let err = f
        .orchestrator
        .exchange_paper(paper_exchange(dec!(20), "Euro-LIQ"))
        .await
        .unwrap_err();
    assert!(matches!(err, OperationError::NotFound(_)));
    assert!(f.ledger.nothing_submitted());
}

#[tokio::test]
async fn test_unreachable_ledger_is_plain_ledger_error() {
    let f = fixture(ledger().unreachable());
    let err = f
        .orchestrator
        .deposit_digital(notes(INDIVIDUAL, dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, OperationError::Ledger(_)));
    assert!(err.nothing_happened());
}

#[tokio::test]
async fn test_digital_exchange_second_leg_names_the_desk() {
    let f = fixture(ledger());
    let report = f
        .orchestrator
        .exchange_digital_at_desk(DigitalExchange {
            desk_login: DESK.to_string(),
            member_login: INDIVIDUAL.to_string(),
            amount: dec!(50.5).into(),
            payment_mode: "Euro-CHQ".to_string(),
        })
        .await
        .unwrap();

    let performed = f.ledger.performed();
    assert_eq!(performed.len(), 2);
    assert_eq!(
        performed[0].payment_type.as_str(),
        "change_numerique_en_bdc_versement_des_euro"
    );
    assert_eq!(performed[0].to, user(DESK));
    assert_eq!(
        field(&performed[0], "mode_de_paiement"),
        Some(&FieldValue::Enumerated("cheque".into()))
    );
    assert_eq!(performed[1].payment_type.as_str(), "credit_du_compte");
    assert_eq!(performed[1].to, user("u-e12345"));
    assert_eq!(field(&performed[1], "bdc"), Some(&linked(DESK)));
    assert_eq!(performed[0].amount, performed[1].amount);
    assert_eq!(report.posting_ids().len(), 2);
}

#[tokio::test]
async fn test_digital_exchange_second_leg_failure_is_partial() {
    let f = fixture(ledger().failing_perform(2));
    let err = f
        .orchestrator
        .exchange_digital_at_desk(DigitalExchange {
            desk_login: DESK.to_string(),
            member_login: INDIVIDUAL.to_string(),
            amount: dec!(50).into(),
            payment_mode: "Euro-LIQ".to_string(),
        })
        .await
        .unwrap_err();

    let OperationError::Partial(failure) = err else {
        panic!("expected a partial failure");
    };
    assert_eq!(failure.operation, "exchange_digital_at_desk");
    assert_eq!(failure.committed_postings(), vec![&PostingId::new("p1")]);
    assert_eq!(failure.failed.index, 2);
    assert_eq!(failure.failed.description, "account_credit");
    assert!(failure.not_transitioned.is_empty());
}

#[tokio::test]
async fn test_deposit_digital_legs() {
    let f = fixture(ledger());
    f.orchestrator
        .deposit_digital(notes(INDIVIDUAL, dec!(30)))
        .await
        .unwrap();

    let performed = f.ledger.performed();
    assert_eq!(performed[0].payment_type.as_str(), "depot_de_billets");
    assert_eq!(performed[0].from, AccountOwner::System);
    assert_eq!(performed[0].to, user(DESK));
    assert_eq!(field(&performed[0], "adherent"), Some(&linked("u-e12345")));
    assert_eq!(performed[0].description, "Dépôt - E12345 - Jon Etxeberri");
    assert_eq!(performed[1].payment_type.as_str(), "credit_du_compte");
    assert_eq!(performed[1].to, user("u-e12345"));
    assert_eq!(field(&performed[1], "bdc"), Some(&linked(DESK)));
}

fn funded_ledger(member_balance: Decimal, desk_stock: Decimal) -> InMemoryLedger {
    ledger()
        .with_account(
            user("u-e12345"),
            &"compte_d_adherent".into(),
            "eusko",
            member_balance,
        )
        .with_account(user(DESK), &"caisse_euro_bdc".into(), "euro", dec!(1000))
        .with_account(user(DESK), &"stock_de_billets_bdc".into(), "eusko", desk_stock)
}

#[tokio::test]
async fn test_withdraw_checks_member_balance_first() {
    let f = fixture(funded_ledger(dec!(5), dec!(100)));
    let err = f
        .orchestrator
        .withdraw_digital(notes(INDIVIDUAL, dec!(10)))
        .await
        .unwrap_err();
    assert!(
        matches!(err, OperationError::InsufficientFunds(ref m) if m == "error-member-not-enough-money")
    );
    assert!(f.ledger.nothing_submitted());
}

#[tokio::test]
async fn test_withdraw_checks_desk_stock() {
    let f = fixture(funded_ledger(dec!(100), dec!(9.99)));
    let err = f
        .orchestrator
        .withdraw_digital(notes(INDIVIDUAL, dec!(10)))
        .await
        .unwrap_err();
    assert!(
        matches!(err, OperationError::InsufficientFunds(ref m) if m == "error-bureau-not-enough-money")
    );
    assert!(f.ledger.nothing_submitted());
}

#[tokio::test]
async fn test_withdraw_debits_member_then_desk() {
    let f = fixture(funded_ledger(dec!(10), dec!(10)));
    f.orchestrator
        .withdraw_digital(notes(INDIVIDUAL, dec!(10)))
        .await
        .unwrap();

    let performed = f.ledger.performed();
    assert_eq!(performed.len(), 2);
    assert_eq!(performed[0].payment_type.as_str(), "retrait_du_compte");
    assert_eq!(performed[0].from, user("u-e12345"));
    assert_eq!(field(&performed[0], "bdc"), Some(&linked(DESK)));
    assert_eq!(performed[1].payment_type.as_str(), "retrait_de_billets");
    assert_eq!(performed[1].from, user(DESK));
    assert_eq!(performed[1].to, AccountOwner::System);
    assert_eq!(performed[1].description, "Retrait - E12345 - Jon Etxeberri");
}

#[tokio::test]
async fn test_withdraw_without_member_account_is_not_found() {
    let f = fixture(ledger());
    let err = f
        .orchestrator
        .withdraw_digital(notes(INDIVIDUAL, dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, OperationError::NotFound(_)));
}

fn bank_transfer(member: &str) -> BankTransferExchange {
    BankTransferExchange {
        member_login: member.to_string(),
        amount: dec!(120).into(),
        bank_reference: "VIR-2024-0042".to_string(),
    }
}

#[tokio::test]
async fn test_bank_transfer_exchange_requires_account_group() {
    let ledger = InMemoryLedger::new().with_user(INDIVIDUAL, "u-e12345", Some("adherents_sans_compte"));
    let f = fixture(ledger);
    let err = f
        .orchestrator
        .exchange_by_bank_transfer(bank_transfer(INDIVIDUAL))
        .await
        .unwrap_err();
    assert!(matches!(err, OperationError::Validation(_)));
    assert!(f.ledger.nothing_submitted());
}

#[tokio::test]
async fn test_bank_transfer_exchange_legs() {
    let f = fixture(ledger());
    f.orchestrator
        .exchange_by_bank_transfer(bank_transfer(INDIVIDUAL))
        .await
        .unwrap();

    let performed = f.ledger.performed();
    let reference = FieldValue::Text("VIR-2024-0042".to_string());
    assert_eq!(
        performed[0].payment_type.as_str(),
        "change_numerique_en_ligne_versement_des_euro"
    );
    assert_eq!(performed[0].to, user("compte_dedie_eusko_numerique"));
    assert_eq!(
        field(&performed[0], "numero_de_transaction_banque"),
        Some(&reference)
    );
    assert_eq!(
        performed[1].payment_type.as_str(),
        "change_numerique_en_ligne_versement_des_eusko"
    );
    assert_eq!(performed[1].to, user("u-e12345"));
    assert_eq!(
        field(&performed[1], "numero_de_transaction_banque"),
        Some(&reference)
    );
}

fn reconversion(member: &str) -> PaperReconversion {
    PaperReconversion {
        desk_login: DESK.to_string(),
        member_login: member.to_string(),
        amount: dec!(200).into(),
        invoice_number: "F-2024-17".to_string(),
    }
}

#[tokio::test]
async fn test_reconversion_forbidden_for_individuals() {
    let f = fixture(ledger());
    let err = f
        .orchestrator
        .reconvert_paper(reconversion(INDIVIDUAL))
        .await
        .unwrap_err();
    assert!(matches!(err, OperationError::Forbidden(_)));
    assert!(f.ledger.nothing_submitted());
}

#[tokio::test]
async fn test_reconversion_for_business() {
    let f = fixture(ledger());
    f.orchestrator
        .reconvert_paper(reconversion(BUSINESS))
        .await
        .unwrap();

    let performed = f.ledger.performed();
    assert_eq!(performed.len(), 1);
    assert_eq!(
        performed[0].payment_type.as_str(),
        "reconversion_billets_versement_des_eusko"
    );
    assert_eq!(
        field(&performed[0], "numero_de_facture"),
        Some(&FieldValue::Text("F-2024-17".to_string()))
    );
    assert_eq!(performed[0].description, "Reconversion - Z00042 - Txokoa");
}

fn subscription(mode: &str) -> SubscriptionPayment {
    SubscriptionPayment {
        desk_login: DESK.to_string(),
        member_login: INDIVIDUAL.to_string(),
        amount: dec!(10).into(),
        payment_mode: mode.to_string(),
    }
}

#[tokio::test]
async fn test_euro_subscription_carries_payment_mode() {
    let f = fixture(ledger());
    f.orchestrator
        .pay_subscription(subscription("Euro-CHQ"))
        .await
        .unwrap();
    settle().await;

    let performed = f.ledger.performed();
    assert_eq!(performed[0].payment_type.as_str(), "cotisation_en_euro");
    assert_eq!(performed[0].currency.as_str(), "euro");
    assert_eq!(
        field(&performed[0], "mode_de_paiement"),
        Some(&FieldValue::Enumerated("cheque".into()))
    );

    let sent = f.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].member_login, INDIVIDUAL);
    assert_eq!(sent[0].amount, "10.00 euro");
}

#[tokio::test]
async fn test_eusko_subscription_has_no_payment_mode() {
    let f = fixture(ledger());
    f.orchestrator
        .pay_subscription(subscription("Eusko-LIQ"))
        .await
        .unwrap();

    let performed = f.ledger.performed();
    assert_eq!(performed[0].payment_type.as_str(), "cotisation_en_eusko");
    assert_eq!(performed[0].currency.as_str(), "eusko");
    assert!(field(&performed[0], "mode_de_paiement").is_none());
    assert_eq!(performed[0].description, "Cotisation - E12345 - Jon Etxeberri");
}

#[tokio::test]
async fn test_unknown_subscription_mode_is_rejected() {
    let f = fixture(ledger());
    let err = f
        .orchestrator
        .pay_subscription(subscription("Bitcoin"))
        .await
        .unwrap_err();
    assert!(matches!(err, OperationError::Validation(_)));
    assert!(f.ledger.calls().is_empty());
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_subscription() {
    let f = fixture_with(ledger(), testing::catalog(), RecordingNotifier::failing());
    let report = f
        .orchestrator
        .pay_subscription(subscription("Euro-LIQ"))
        .await
        .unwrap();
    settle().await;

    assert_eq!(report.posting_ids().len(), 1);
    assert_eq!(f.notifier.sent().len(), 1);
}

fn digital_subscription(amount: &str) -> DigitalSubscription {
    DigitalSubscription {
        member_login: INDIVIDUAL.to_string(),
        amount: amount.into(),
    }
}

fn collector_ledger(member_balance: Decimal) -> InMemoryLedger {
    funded_ledger(member_balance, dec!(0)).with_user("Z00001", "u-euskal-moneta", None)
}

#[tokio::test]
async fn test_digital_subscription_pays_euskal_moneta() {
    let f = fixture(collector_ledger(dec!(50)));
    let report = f
        .orchestrator
        .pay_subscription_digital(digital_subscription("12,5"))
        .await
        .unwrap();
    settle().await;

    let performed = f.ledger.performed();
    assert_eq!(performed.len(), 1);
    let leg = &performed[0];
    assert_eq!(leg.payment_type.as_str(), "virement_inter_adherent");
    assert_eq!(leg.currency.as_str(), "eusko");
    assert_eq!(leg.amount, Amount::new(dec!(12.5)).unwrap());
    assert_eq!(leg.from, user("u-e12345"));
    assert_eq!(leg.to, user("u-euskal-moneta"));
    assert!(leg.custom_values.is_empty());
    assert_eq!(leg.description, "Cotisation - E12345 - Jon Etxeberri");
    assert_eq!(report.posting_ids().len(), 1);
    assert!(f.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_digital_subscription_checks_member_balance() {
    let f = fixture(collector_ledger(dec!(12)));
    let err = f
        .orchestrator
        .pay_subscription_digital(digital_subscription("12.50"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, OperationError::InsufficientFunds(ref m) if m == "error-member-not-enough-money")
    );
    assert!(f.ledger.nothing_submitted());
}

#[tokio::test]
async fn test_digital_subscription_without_collector_is_not_found() {
    let f = fixture(funded_ledger(dec!(50), dec!(0)));
    let err = f
        .orchestrator
        .pay_subscription_digital(digital_subscription("10"))
        .await
        .unwrap_err();
    assert!(matches!(err, OperationError::NotFound(ref m) if m.contains("Z00001")));
    assert!(f.ledger.nothing_submitted());
}

#[rstest]
#[case("abc")]
#[case("12.345")]
#[tokio::test]
async fn test_digital_subscription_rejects_bad_amount(#[case] amount: &str) {
    let f = fixture(collector_ledger(dec!(50)));
    let err = f
        .orchestrator
        .pay_subscription_digital(digital_subscription(amount))
        .await
        .unwrap_err();
    assert!(matches!(err, OperationError::Validation(_)));
    assert!(f.ledger.calls().is_empty());
}

#[tokio::test]
async fn test_stock_out_and_vault_out() {
    let f = fixture(ledger());
    let transport = NotesTransport {
        desk_login: DESK.to_string(),
        amount: dec!(500).into(),
        carrier: UserId::new("porteur-1"),
        description: "Tournée du mardi".to_string(),
    };
    f.orchestrator.stock_out(transport.clone()).await.unwrap();
    f.orchestrator.vault_out(transport).await.unwrap();

    let performed = f.ledger.performed();
    assert_eq!(performed[0].payment_type.as_str(), "sortie_stock_bdc");
    assert_eq!(performed[0].from, user(DESK));
    assert_eq!(field(&performed[0], "porteur"), Some(&linked("porteur-1")));
    assert_eq!(performed[0].description, "Tournée du mardi");

    assert_eq!(performed[1].payment_type.as_str(), "sortie_coffre");
    assert_eq!(performed[1].from, AccountOwner::System);
    assert_eq!(performed[1].to, AccountOwner::System);
    assert_eq!(field(&performed[1], "bdc"), Some(&linked(DESK)));
    assert_eq!(performed[1].amount, Amount::new(dec!(500)).unwrap());
}

#[tokio::test]
async fn test_desk_accounts() {
    let f = fixture(funded_ledger(dec!(1), dec!(250)));
    let accounts = f.orchestrator.desk_accounts(DESK).await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert!(accounts.iter().any(|a| a.balance == dec!(250)));
}
