//! End-to-end quorum signing scenarios.

#![allow(clippy::unwrap_used)]

use notary_core::time::{unix_now, unix_to_rfc3339};
use notary_core::{Digest, RunId};
use notary_quorum::{LocalQuorum, QuorumClient, QuorumError, QuorumSigner, SigningJob};
use notary_session::{Ability, Capability, SessionAuthorizer, SessionChallenge};
use std::sync::Arc;
use std::time::Duration;

fn required() -> Vec<Capability> {
    vec![
        Capability::any(Ability::SignDigest),
        Capability::any(Ability::ExecuteJob),
    ]
}

async fn fresh_job(
    quorum: &LocalQuorum,
    authorizer: &SessionAuthorizer,
    digest: Digest,
) -> SigningJob {
    let challenge = quorum.issue_challenge(&required(), 600).await.unwrap();
    let authorization = authorizer
        .obtain_authorization(&challenge, &required())
        .unwrap();
    SigningJob::sign_digest(
        RunId::random(),
        digest,
        quorum.group_public_key(),
        authorization,
    )
}

#[tokio::test]
async fn sign_hello_world_and_reject_foreign_digest() {
    let quorum = Arc::new(LocalQuorum::new(3, 2, [42u8; 32]).unwrap());
    let signer = QuorumSigner::new(quorum.clone());
    let authorizer = SessionAuthorizer::new([7u8; 32]);

    let digest = Digest::of(b"hello-world");
    let job = fresh_job(&quorum, &authorizer, digest).await;
    let response = signer.sign(&job, Duration::from_secs(5)).await.unwrap();

    let aggregated = response.primary().unwrap();
    aggregated.verify(&digest).unwrap();

    // The same signature must not verify against any other digest.
    let other = Digest::of(b"hello-world-2");
    assert!(aggregated.verify(&other).is_err());
}

#[tokio::test]
async fn unavailable_then_retry_with_fresh_authorization() {
    let quorum = Arc::new(LocalQuorum::new(3, 2, [42u8; 32]).unwrap());
    let signer = QuorumSigner::new(quorum.clone());
    let authorizer = SessionAuthorizer::new([7u8; 32]);
    let digest = Digest::of(b"retry-artifact");

    // First attempt: too few nodes reachable.
    quorum.set_node_online(0, false);
    quorum.set_node_online(1, false);
    let job = fresh_job(&quorum, &authorizer, digest).await;
    assert!(matches!(
        signer.sign(&job, Duration::from_secs(5)).await,
        Err(QuorumError::Unavailable { .. })
    ));

    // Nodes recover; a fresh (non-expired) authorization completes the run.
    quorum.set_node_online(0, true);
    quorum.set_node_online(1, true);
    let job = fresh_job(&quorum, &authorizer, digest).await;
    let response = signer.sign(&job, Duration::from_secs(5)).await.unwrap();
    response.primary().unwrap().verify(&digest).unwrap();
}

#[tokio::test]
async fn retry_with_expired_authorization_fails_deterministically() {
    let quorum = Arc::new(LocalQuorum::new(3, 2, [42u8; 32]).unwrap());
    let signer = QuorumSigner::new(quorum.clone());
    let authorizer = SessionAuthorizer::new([7u8; 32]);
    let digest = Digest::of(b"retry-artifact");

    // An authorization that has already lapsed.
    let expired_challenge = SessionChallenge::new(
        "notary:session:expired",
        unix_to_rfc3339(unix_now().saturating_sub(120)),
        required(),
        "head-0",
    );
    let expired = authorizer
        .obtain_authorization(&expired_challenge, &required())
        .unwrap();
    let job = SigningJob::sign_digest(
        RunId::random(),
        digest,
        quorum.group_public_key(),
        expired,
    );

    // Deterministic rejection, every time.
    for _ in 0..3 {
        assert!(matches!(
            signer.sign(&job, Duration::from_secs(5)).await,
            Err(QuorumError::AuthorizationRejected(_))
        ));
    }
}

#[tokio::test]
async fn threshold_subsets_produce_verifiable_signatures() {
    let quorum = Arc::new(LocalQuorum::new(5, 3, [42u8; 32]).unwrap());
    let signer = QuorumSigner::new(quorum.clone());
    let authorizer = SessionAuthorizer::new([7u8; 32]);
    let digest = Digest::of(b"subset-artifact");

    // Knock out two nodes; the remaining three still meet the threshold.
    quorum.set_node_online(0, false);
    quorum.set_node_online(4, false);
    let job = fresh_job(&quorum, &authorizer, digest).await;
    let response = signer.sign(&job, Duration::from_secs(5)).await.unwrap();
    response.primary().unwrap().verify(&digest).unwrap();
}
