//! Integration tests for quotes, invoices, numbering and prospects.

use agence_core::error::CoreError;
use agence_core::line_item::{DevisItem, FactureItem};
use agence_core::totals::{INVOICE_TYPE_ACOMPTE, INVOICE_TYPE_STANDARD};
use agence_core::types::{Date, DbId};
use agence_core::workflow::{devis, facture, prospect};
use agence_db::models::client::CreateClient;
use agence_db::models::devis::CreateDevis;
use agence_db::models::facture::CreateFacture;
use agence_db::models::prospect::CreateProspect;
use agence_db::repositories::{ClientRepo, DevisRepo, FactureRepo, ProspectRepo};
use agence_db::DbError;
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> Date {
    s.parse().unwrap()
}

async fn new_client(pool: &PgPool, name: &str) -> DbId {
    let input = CreateClient {
        name: name.to_string(),
        company: None,
        email: Some("contact@example.fr".to_string()),
        phone: None,
        address: None,
        notes: None,
    };
    ClientRepo::create(pool, &input).await.unwrap().id
}

fn new_devis(client_id: DbId, items: Vec<DevisItem>) -> CreateDevis {
    CreateDevis {
        client_id,
        title: "Site vitrine".to_string(),
        vat_rate: None,
        valid_until: None,
        items,
    }
}

fn new_facture(client_id: DbId, items: Vec<FactureItem>) -> CreateFacture {
    CreateFacture {
        client_id,
        devis_id: None,
        invoice_type: INVOICE_TYPE_STANDARD.to_string(),
        title: "Maintenance".to_string(),
        due_date: None,
        items,
    }
}

// ---------------------------------------------------------------------------
// Devis
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_devis_totals_and_items(pool: PgPool) {
    let client_id = new_client(&pool, "Boulangerie Martin").await;
    let items = vec![
        DevisItem::new("Développement", d("10"), d("50.00")).with_discount(d("10")),
        DevisItem::new("Hébergement", d("1"), d("550.00")),
    ];

    let created = DevisRepo::create(&pool, &new_devis(client_id, items), date("2026-03-02"))
        .await
        .unwrap();

    assert_eq!(created.reference, "DEV-2026-0001");
    assert_eq!(created.status, devis::STATUS_BROUILLON);
    assert_eq!(created.total_ht, d("1000.00"));
    assert_eq!(created.total_vat, d("200.00"));
    assert_eq!(created.total_ttc, d("1200.00"));
    assert_eq!(created.valid_until, Some(date("2026-04-01")));

    let rows = DevisRepo::list_items(&pool, created.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].position, 1);
    assert_eq!(rows[0].total, d("450.00"));
    assert_eq!(rows[0].to_item().discount, d("10"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_devis_vat_change_keeps_ht(pool: PgPool) {
    let client_id = new_client(&pool, "Atelier Roux").await;
    let items = vec![DevisItem::new("Audit", d("1"), d("1000.00"))];
    let created = DevisRepo::create(&pool, &new_devis(client_id, items), date("2026-03-02"))
        .await
        .unwrap();

    let updated = DevisRepo::set_vat_rate(&pool, created.id, d("10.00"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.total_ht, d("1000.00"));
    assert_eq!(updated.total_ttc, d("1100.00"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_devis_is_not_stored(pool: PgPool) {
    let client_id = new_client(&pool, "Atelier Roux").await;
    let day = date("2026-03-02");

    let audit = DevisItem::new("Audit", d("1"), d("1000.00"));
    let mut over_vat = new_devis(client_id, vec![audit.clone()]);
    over_vat.vat_rate = Some(d("150"));
    let bad_lines = [
        DevisItem::new("Ligne", d("-3"), d("100.00")).with_discount(d("150")),
        DevisItem::new("Remise", d("1"), d("-50.00")),
        DevisItem::new(" ", d("1"), d("10.00")),
    ];

    let err = DevisRepo::create(&pool, &over_vat, day).await.unwrap_err();
    assert!(matches!(err, DbError::Core(CoreError::Validation(_))), "got {err:?}");
    for item in bad_lines {
        let err = DevisRepo::create(&pool, &new_devis(client_id, vec![item]), day)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))), "got {err:?}");
    }

    // Rejected quotes neither persist nor consume a reference.
    let drafts = DevisRepo::list_by_status(&pool, &[devis::STATUS_BROUILLON]).await.unwrap();
    assert!(drafts.is_empty());
    let valid = new_devis(client_id, vec![audit]);
    let created = DevisRepo::create(&pool, &valid, day).await.unwrap();
    assert_eq!(created.reference, "DEV-2026-0001");

    let err = DevisRepo::set_vat_rate(&pool, created.id, d("150")).await.unwrap_err();
    assert!(matches!(err, DbError::Core(CoreError::Validation(_))), "got {err:?}");
    let unchanged = DevisRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(unchanged.vat_rate, created.vat_rate);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_facture_is_not_stored(pool: PgPool) {
    let client_id = new_client(&pool, "Cabinet Leroy").await;
    let day = date("2026-03-02");

    let forfait = FactureItem::new("Forfait", d("1"), d("90.00"));
    let mut credit_note = new_facture(client_id, vec![forfait.clone()]);
    credit_note.invoice_type = "avoir".to_string();
    let err = FactureRepo::create(&pool, &credit_note, day).await.unwrap_err();
    assert!(matches!(err, DbError::Core(CoreError::Validation(_))), "got {err:?}");

    let negative = new_facture(client_id, vec![FactureItem::new("Forfait", d("0"), d("90.00"))]);
    let err = FactureRepo::create(&pool, &negative, day).await.unwrap_err();
    assert!(matches!(err, DbError::Core(CoreError::Validation(_))), "got {err:?}");

    let valid = new_facture(client_id, vec![forfait]);
    let created = FactureRepo::create(&pool, &valid, day).await.unwrap();
    assert_eq!(created.reference, "FAC-2026-0001");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_references_are_sequential_per_year(pool: PgPool) {
    let client_id = new_client(&pool, "Cabinet Leroy").await;

    let first = DevisRepo::create(&pool, &new_devis(client_id, vec![]), date("2026-12-30"))
        .await
        .unwrap();
    let second = DevisRepo::create(&pool, &new_devis(client_id, vec![]), date("2026-12-31"))
        .await
        .unwrap();
    let next_year = DevisRepo::create(&pool, &new_devis(client_id, vec![]), date("2027-01-02"))
        .await
        .unwrap();
    let invoice = FactureRepo::create(&pool, &new_facture(client_id, vec![]), date("2026-12-31"))
        .await
        .unwrap();

    assert_eq!(first.reference, "DEV-2026-0001");
    assert_eq!(second.reference, "DEV-2026-0002");
    assert_eq!(next_year.reference, "DEV-2027-0001");
    assert_eq!(invoice.reference, "FAC-2026-0001");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_devis_status_update_stamps_dates(pool: PgPool) {
    let client_id = new_client(&pool, "Garage Petit").await;
    let created = DevisRepo::create(&pool, &new_devis(client_id, vec![]), date("2026-03-02"))
        .await
        .unwrap();

    let sent = DevisRepo::update_status(&pool, created.id, devis::STATUS_BROUILLON, devis::STATUS_ENVOYE)
        .await
        .unwrap()
        .unwrap();
    assert!(sent.sent_at.is_some());
    assert!(sent.accepted_at.is_none());

    // Stale expected status: no row updated.
    let stale = DevisRepo::update_status(&pool, created.id, devis::STATUS_BROUILLON, devis::STATUS_ANNULE)
        .await
        .unwrap();
    assert!(stale.is_none());

    let accepted = DevisRepo::update_status(&pool, created.id, devis::STATUS_ENVOYE, devis::STATUS_ACCEPTE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accepted.status, devis::STATUS_ACCEPTE);
    assert_eq!(accepted.sent_at, sent.sent_at);
    assert!(accepted.accepted_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_lapsed_devis(pool: PgPool) {
    let client_id = new_client(&pool, "Fleuriste Blanc").await;
    let mut input = new_devis(client_id, vec![]);
    input.valid_until = Some(date("2026-04-01"));

    let draft = DevisRepo::create(&pool, &input, date("2026-03-02")).await.unwrap();
    let sent = DevisRepo::create(&pool, &input, date("2026-03-02")).await.unwrap();
    DevisRepo::update_status(&pool, sent.id, devis::STATUS_BROUILLON, devis::STATUS_ENVOYE)
        .await
        .unwrap();

    let on_last_day = DevisRepo::list_lapsed(&pool, date("2026-04-01")).await.unwrap();
    assert!(on_last_day.is_empty());

    let lapsed = DevisRepo::list_lapsed(&pool, date("2026-04-02")).await.unwrap();
    let ids: Vec<DbId> = lapsed.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![sent.id]);
    assert!(!ids.contains(&draft.id));
}

// ---------------------------------------------------------------------------
// Factures
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_facture_totals_include_line_vat(pool: PgPool) {
    let client_id = new_client(&pool, "Librairie Moreau").await;
    let items = vec![
        FactureItem::new("Développement", d("10"), d("50.00")).with_discount(d("10")),
        FactureItem::new("Livre", d("1"), d("100.00")).with_vat_rate(d("5.5")),
    ];

    let created = FactureRepo::create(&pool, &new_facture(client_id, items), date("2026-05-10"))
        .await
        .unwrap();

    assert_eq!(created.total_ht, d("550.00"));
    assert_eq!(created.total_vat, d("95.50"));
    assert_eq!(created.total_ttc, d("645.50"));
    assert_eq!(created.due_date, Some(date("2026-06-09")));

    let rows = FactureRepo::list_items(&pool, created.id).await.unwrap();
    assert_eq!(rows[0].total, d("540.00"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_facture_overdue_and_payment(pool: PgPool) {
    let client_id = new_client(&pool, "Pharmacie Girard").await;
    let mut input = new_facture(client_id, vec![FactureItem::new("Forfait", d("1"), d("80"))]);
    input.due_date = Some(date("2026-06-01"));
    let created = FactureRepo::create(&pool, &input, date("2026-05-01")).await.unwrap();

    assert!(FactureRepo::list_overdue(&pool, date("2026-06-02")).await.unwrap().is_empty());

    FactureRepo::update_status(&pool, created.id, facture::STATUS_BROUILLON, facture::STATUS_ENVOYEE)
        .await
        .unwrap()
        .unwrap();
    let overdue = FactureRepo::list_overdue(&pool, date("2026-06-02")).await.unwrap();
    assert_eq!(overdue.len(), 1);

    let paid = FactureRepo::update_status(&pool, created.id, facture::STATUS_ENVOYEE, facture::STATUS_PAYEE)
        .await
        .unwrap()
        .unwrap();
    assert!(paid.paid_at.is_some());
    assert!(paid.sent_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deposits_ignore_cancelled_invoices(pool: PgPool) {
    let client_id = new_client(&pool, "Studio Faure").await;
    let quote = DevisRepo::create(
        &pool,
        &new_devis(client_id, vec![DevisItem::new("Refonte", d("1"), d("2500"))]),
        date("2026-02-01"),
    )
    .await
    .unwrap();

    let mut deposit = new_facture(client_id, vec![FactureItem::new("Acompte", d("1"), d("750"))]);
    deposit.devis_id = Some(quote.id);
    deposit.invoice_type = INVOICE_TYPE_ACOMPTE.to_string();
    FactureRepo::create(&pool, &deposit, date("2026-02-02")).await.unwrap();
    let cancelled = FactureRepo::create(&pool, &deposit, date("2026-02-03")).await.unwrap();
    FactureRepo::update_status(&pool, cancelled.id, facture::STATUS_BROUILLON, facture::STATUS_ANNULEE)
        .await
        .unwrap();

    let deposits = FactureRepo::deposits_ht_for_devis(&pool, quote.id).await.unwrap();
    assert_eq!(deposits, vec![d("750.00")]);
    assert_eq!(FactureRepo::list_by_devis(&pool, quote.id).await.unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Prospects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_won_prospect_keeps_its_client(pool: PgPool) {
    let input = CreateProspect {
        name: "Julie Bernard".to_string(),
        company: Some("Bernard & Fils".to_string()),
        email: Some("julie@bernard.fr".to_string()),
        phone: None,
        source: Some("salon".to_string()),
        notes: None,
        next_follow_up: None,
    };
    let created = ProspectRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.status, prospect::STATUS_IDENTIFIE);

    let (_, client) =
        ProspectRepo::mark_won(&pool, created.id, prospect::STATUS_IDENTIFIE, prospect::STATUS_GAGNE)
            .await
            .unwrap()
            .unwrap();
    assert_eq!(client.company.as_deref(), Some("Bernard & Fils"));

    let (_, again) =
        ProspectRepo::mark_won(&pool, created.id, prospect::STATUS_GAGNE, prospect::STATUS_GAGNE)
            .await
            .unwrap()
            .unwrap();
    assert_eq!(again.id, client.id);
    assert_eq!(ClientRepo::list(&pool, 10, 0).await.unwrap().len(), 1);

    let linked = ProspectRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(linked.client_id, Some(client.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_winning_prospect_is_atomic(pool: PgPool) {
    let input = CreateProspect {
        name: "Marc Petit".to_string(),
        company: None,
        email: Some("marc@petit.fr".to_string()),
        phone: None,
        source: None,
        notes: None,
        next_follow_up: None,
    };
    let created = ProspectRepo::create(&pool, &input).await.unwrap();

    // A stale `from` writes nothing: no status change and no client.
    let stale = ProspectRepo::mark_won(
        &pool,
        created.id,
        prospect::STATUS_PROPOSITION,
        prospect::STATUS_GAGNE,
    )
    .await
    .unwrap();
    assert!(stale.is_none());
    assert!(ClientRepo::list(&pool, 10, 0).await.unwrap().is_empty());

    let (won, client) =
        ProspectRepo::mark_won(&pool, created.id, &created.status, prospect::STATUS_GAGNE)
            .await
            .unwrap()
            .unwrap();
    assert_eq!(won.status, prospect::STATUS_GAGNE);
    assert_eq!(won.client_id, Some(client.id));
    assert_eq!(client.name, "Marc Petit");

    let linked = ProspectRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(linked.status, prospect::STATUS_GAGNE);
    assert_eq!(linked.client_id, Some(client.id));

    let missing =
        ProspectRepo::mark_won(&pool, 999_999, prospect::STATUS_IDENTIFIE, prospect::STATUS_GAGNE)
            .await
            .unwrap();
    assert!(missing.is_none());
}
