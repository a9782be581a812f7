mod support;

use cargolink::api::{ContractAPI, DocumentAPI, MemberAPI, PaymentAPI};
use cargolink::entities::{
    Contract, ContractChanges, ContractStatus, DocumentFilter, DocumentRequest, DocumentType,
    MemberChanges, NewContract, NewPayment, Role, UserType,
};
use tokio_test::block_on;
use uuid::Uuid;

fn new_contract(merchant_id: Uuid) -> NewContract {
    NewContract {
        merchant_id: Some(merchant_id),
        carrier_id: None,
        title: "T".into(),
        content: "C".into(),
        terms: "Net 30".into(),
        value: None,
        start_date: None,
        end_date: None,
    }
}

fn files_for(dir: &std::path::Path, entity_id: &Uuid) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.file_name().to_string_lossy().contains(&entity_id.to_string()))
                .count()
        })
        .unwrap_or(0)
}

#[test]
fn pending_contract_cannot_be_deleted() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let merchant = h.member(Role::Merchant, UserType::Professional).await;

        let contract = h
            .engine
            .create_contract(h.admin.clone(), new_contract(merchant.id))
            .await
            .unwrap();
        assert_eq!(contract.status, ContractStatus::PendingSignature);

        let document = h
            .engine
            .generate_document(
                h.admin.clone(),
                DocumentRequest {
                    document_type: DocumentType::Contract,
                    entity_id: contract.id,
                },
            )
            .await
            .unwrap();

        let err = h
            .engine
            .delete_contract(h.admin.clone(), contract.id)
            .await
            .unwrap_err();

        assert!(err.is_invalid_input_error());
        assert_eq!(err.message, "Only DRAFT contracts can be deleted");

        assert!(h.exists("contracts", &contract.id).await);
        assert!(h.exists("documents", &document.id).await);
        assert_eq!(files_for(&h.documents_dir(), &contract.id), 1);
    });
}

#[test]
fn draft_contract_is_deleted_with_its_documents() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let merchant = h.member(Role::Merchant, UserType::Professional).await;

        let contract = h
            .engine
            .create_contract(h.admin.clone(), new_contract(merchant.id))
            .await
            .unwrap();

        let document = h
            .engine
            .generate_document(
                h.admin.clone(),
                DocumentRequest {
                    document_type: DocumentType::Contract,
                    entity_id: contract.id,
                },
            )
            .await
            .unwrap();

        let contract: Contract = h
            .engine
            .update_contract(
                h.admin.clone(),
                contract.id,
                ContractChanges {
                    status: Some(ContractStatus::Draft),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        h.engine
            .delete_contract(h.admin.clone(), contract.id)
            .await
            .unwrap();

        assert!(!h.exists("contracts", &contract.id).await);
        assert!(!h.exists("documents", &document.id).await);
        assert_eq!(files_for(&h.documents_dir(), &contract.id), 0);
    });
}

#[test]
fn contracts_need_a_professional_holder() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let individual = h.member(Role::Merchant, UserType::Individual).await;

        let err = h
            .engine
            .create_contract(h.admin.clone(), new_contract(individual.id))
            .await
            .unwrap_err();

        assert!(err.is_invalid_input_error());

        let mut both = new_contract(individual.id);
        both.carrier_id = Some(individual.id);

        let err = h
            .engine
            .create_contract(h.admin.clone(), both)
            .await
            .unwrap_err();

        assert!(err.is_invalid_input_error());
    });
}

#[test]
fn contract_document_for_non_professional_leaves_no_trace() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let merchant = h.member(Role::Merchant, UserType::Professional).await;

        let contract = h
            .engine
            .create_contract(h.admin.clone(), new_contract(merchant.id))
            .await
            .unwrap();

        h.engine
            .update_member(
                h.admin.clone(),
                merchant.id,
                MemberChanges {
                    user_type: Some(UserType::Individual),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = h
            .engine
            .generate_document(
                h.admin.clone(),
                DocumentRequest {
                    document_type: DocumentType::Contract,
                    entity_id: contract.id,
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_invalid_input_error());
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        let documents = h
            .engine
            .list_documents(
                h.admin.clone(),
                DocumentFilter {
                    related_entity_id: Some(contract.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(documents.is_empty());
        assert_eq!(files_for(&h.documents_dir(), &contract.id), 0);
    });
}

#[test]
fn invoice_is_written_to_disk_and_removed_with_its_row() {
    block_on(async {
        let h = match support::harness().await {
            Some(h) => h,
            None => return,
        };

        let customer = h.member(Role::Customer, UserType::Individual).await;

        let payment = h
            .engine
            .record_payment(
                h.admin.clone(),
                NewPayment {
                    member_id: customer.id,
                    match_id: None,
                    amount: 42.5,
                    currency: Some("eur".into()),
                    status: None,
                    description: Some("Monthly plan".into()),
                },
            )
            .await
            .unwrap();

        let document = h
            .engine
            .generate_document(
                h.admin.clone(),
                DocumentRequest {
                    document_type: DocumentType::Invoice,
                    entity_id: payment.id,
                },
            )
            .await
            .unwrap();

        assert_eq!(document.member_id, customer.id);
        assert!(document.filename.starts_with("invoice_"));
        assert_eq!(document.file_path, format!("/documents/{}", document.filename));

        let on_disk = std::fs::metadata(h.documents_dir().join(&document.filename)).unwrap();
        assert_eq!(on_disk.len() as i64, document.file_size);

        h.engine
            .delete_document(h.admin.clone(), document.id)
            .await
            .unwrap();

        assert!(!h.exists("documents", &document.id).await);
        assert!(!h.documents_dir().join(&document.filename).exists());
    });
}
