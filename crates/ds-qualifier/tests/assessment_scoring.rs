use ds_qualifier::assessment::{
    custom_weight_field, Assessor, CatalogError, Domain, MaturityTier, Profile, ProfileCatalog,
    Question, QuestionCatalog, Submission, BALANCED_PROFILE, CUSTOM_PROFILE,
};
use std::collections::BTreeMap;

const WEIGHT_STEPS: [&str; 3] = ["1.0", "1.5", "2.0"];

fn question_ids(assessor: &Assessor) -> Vec<String> {
    assessor
        .questions()
        .domains()
        .iter()
        .flat_map(|domain| domain.questions.iter().map(|q| q.id.clone()))
        .collect()
}

/// Answers every question whose bit is set in `mask` with "1", the rest "0".
fn masked_submission(ids: &[String], mask: u32, profile: &str) -> Submission {
    ids.iter()
        .enumerate()
        .fold(Submission::new().with("profile", profile), |submission, (bit, id)| {
            let value = if mask & (1 << bit) != 0 { "1" } else { "0" };
            submission.with(id.as_str(), value)
        })
}

fn sample_masks() -> impl Iterator<Item = u32> {
    (0..(1_u32 << 21)).step_by(9_973).chain([0x1F_FFFF])
}

#[test]
fn all_positive_answers_reach_the_ceiling_under_uniform_weights() {
    let assessor = Assessor::standard();
    let ids = question_ids(&assessor);

    for profile in [BALANCED_PROFILE, CUSTOM_PROFILE] {
        let result = assessor.assess(&masked_submission(&ids, 0x1F_FFFF, profile));

        assert_eq!(result.raw_total, 21);
        assert_eq!(result.composite_score, 21.0);
        assert_eq!(result.composite_percentage, 100);
        assert_eq!(result.tier(), MaturityTier::Advanced);
        assert!(result.unknown_questions.is_empty());
        assert!(result
            .domains
            .iter()
            .all(|domain| domain.percentage == 100 && domain.maturity == MaturityTier::Advanced));
    }
}

#[test]
fn all_unknown_answers_score_zero_and_list_every_question() {
    let assessor = Assessor::standard();
    let submission = question_ids(&assessor)
        .into_iter()
        .fold(Submission::new(), |submission, id| submission.with(id, "unknown"));

    let result = assessor.assess(&submission);

    assert_eq!(result.raw_total, 0);
    assert_eq!(result.composite_score, 0.0);
    assert_eq!(result.tier(), MaturityTier::Foundation);
    assert_eq!(result.unknown_count(), 21);
    assert_eq!(result.unknown_questions.len(), 7);
    let grouped: Vec<_> = result
        .unknown_questions
        .iter()
        .map(|group| group.domain.as_str())
        .collect();
    assert_eq!(
        grouped,
        assessor.questions().domain_names().collect::<Vec<_>>()
    );
    assert!(result
        .unknown_questions
        .iter()
        .all(|group| group.questions.len() == 3));
}

#[test]
fn empty_submission_is_a_zero_foundation_result() {
    let result = Assessor::standard().assess(&Submission::new());

    assert_eq!(result.raw_total, 0);
    assert_eq!(result.composite_score, 0.0);
    assert_eq!(result.composite_percentage, 0);
    assert_eq!(result.tier(), MaturityTier::Foundation);
    assert_eq!(result.profile.key, BALANCED_PROFILE);
    assert!(result.unknown_questions.is_empty());
}

#[test]
fn domain_raw_scores_stay_within_their_maximum() {
    let assessor = Assessor::standard();
    let ids = question_ids(&assessor);

    for mask in sample_masks() {
        let result = assessor.assess(&masked_submission(&ids, mask, "government"));
        assert_eq!(result.raw_total, mask.count_ones());
        for domain in &result.domains {
            assert!(domain.raw_score <= domain.max_score, "{}", domain.domain);
            assert!(domain.percentage <= 100);
        }
    }
}

#[test]
fn oversized_answers_count_once() {
    let result = Assessor::standard().assess(
        &Submission::new()
            .with("ds1", "7")
            .with("ds2", "42")
            .with("ds3", "1")
            .with("ts1", "-3")
            .with("ts2", "yes"),
    );

    let data = result.domain("Data Sovereignty").expect("domain present");
    assert_eq!(data.raw_score, 3);
    assert_eq!(data.raw_score, data.max_score);
    assert_eq!(result.raw_total, 3);
}

#[test]
fn composite_stays_on_scale_for_every_weight_grid_point() {
    let assessor = Assessor::standard();
    let ids = question_ids(&assessor);
    let domains: Vec<String> = assessor
        .questions()
        .domain_names()
        .map(str::to_string)
        .collect();

    for mask in [0_u32, 0b111, 0x15_5555, 0x0A_AAAA, 0x1F_FFFF] {
        let answers = masked_submission(&ids, mask, CUSTOM_PROFILE);
        for point in 0..3_usize.pow(7) {
            let mut submission = answers.clone();
            let mut remaining = point;
            for domain in &domains {
                submission.insert(custom_weight_field(domain), WEIGHT_STEPS[remaining % 3]);
                remaining /= 3;
            }

            let result = assessor.assess(&submission);
            assert!(
                (0.0..=21.0).contains(&result.composite_score),
                "mask {mask:#x} point {point}: {}",
                result.composite_score
            );
        }
    }
}

#[test]
fn equal_weights_reproduce_the_raw_total() {
    let assessor = Assessor::standard();
    let ids = question_ids(&assessor);
    let domains: Vec<String> = assessor
        .questions()
        .domain_names()
        .map(str::to_string)
        .collect();

    for weight in ["1.0", "1.3", "2.0"] {
        for mask in sample_masks() {
            let mut submission = masked_submission(&ids, mask, CUSTOM_PROFILE);
            for domain in &domains {
                submission.insert(custom_weight_field(domain), weight);
            }

            let result = assessor.assess(&submission);
            assert_eq!(
                result.composite_score,
                f64::from(result.raw_total),
                "weight {weight} mask {mask:#x}"
            );
        }
    }
}

#[test]
fn unknown_answers_are_neutral() {
    let assessor = Assessor::standard();
    let ids = question_ids(&assessor);

    for mask in sample_masks() {
        let unknown_mask = mask.rotate_left(5) & 0x1F_FFFF;
        let mut omitted = Submission::new().with("profile", "manufacturing");
        let mut marked = Submission::new().with("profile", "manufacturing");
        for (bit, id) in ids.iter().enumerate() {
            if unknown_mask & (1 << bit) != 0 {
                marked.insert(id.as_str(), "unknown");
            } else if mask & (1 << bit) != 0 {
                omitted.insert(id.as_str(), "1");
                marked.insert(id.as_str(), "1");
            }
        }

        let without = assessor.assess(&omitted);
        let with_unknown = assessor.assess(&marked);

        assert_eq!(with_unknown.composite_score, without.composite_score);
        assert_eq!(with_unknown.raw_total, without.raw_total);
        assert_eq!(
            with_unknown.unknown_count(),
            unknown_mask.count_ones() as usize
        );
    }
}

#[test]
fn out_of_range_custom_weights_are_clamped() {
    let assessor = Assessor::standard();
    let result = assessor.assess(
        &Submission::new()
            .with("profile", CUSTOM_PROFILE)
            .with(custom_weight_field("Data Sovereignty"), "0.5")
            .with(custom_weight_field("Technical Sovereignty"), "3.0")
            .with(custom_weight_field("Open Source"), "heavy"),
    );

    let weight = |name: &str| result.domain(name).expect("domain present").weight;
    assert_eq!(weight("Data Sovereignty"), 1.0);
    assert_eq!(weight("Technical Sovereignty"), 2.0);
    assert_eq!(weight("Open Source"), 1.0);
}

#[test]
fn unrecognised_profile_falls_back_to_balanced() {
    let assessor = Assessor::standard();
    let submission = Submission::new().with("profile", "aerospace").with("ds1", "1");

    let result = assessor.assess(&submission);

    assert_eq!(result.profile.key, BALANCED_PROFILE);
    assert!(result.domains.iter().all(|domain| domain.weight == 1.0));
    assert_eq!(result.composite_score, 1.0);
}

#[test]
fn profiles_with_different_weights_diverge() {
    let assessor = Assessor::standard();
    let answers = |profile: &str| {
        Submission::new()
            .with("profile", profile)
            .with("ds1", "1")
            .with("ds2", "1")
            .with("ds3", "1")
    };

    let financial = assessor.assess(&answers("financial"));
    let technology = assessor.assess(&answers("technology"));
    let balanced = assessor.assess(&answers(BALANCED_PROFILE));

    assert_eq!(financial.raw_total, technology.raw_total);
    assert_eq!(financial.composite_score, 4.0);
    assert_eq!(technology.composite_score, 3.0);
    assert_eq!(balanced.composite_score, 3.0);
    assert_ne!(financial.composite_score, technology.composite_score);
}

#[test]
fn equal_domain_percentages_agree_across_profiles() {
    let assessor = Assessor::standard();
    let answers = assessor
        .questions()
        .domains()
        .iter()
        .fold(Submission::new(), |submission, domain| {
            submission.with(domain.questions[0].id.as_str(), "1")
        });

    for profile in assessor.profiles().profiles() {
        let result = assessor.assess(&answers.clone().with("profile", profile.key.as_str()));
        assert_eq!(result.composite_score, 7.0, "profile {}", profile.key);
    }
}

fn small_catalog() -> Vec<Domain> {
    let domain = |name: &str, key: &str, count: usize| Domain {
        name: name.to_string(),
        key: key.to_string(),
        description: format!("{name} readiness"),
        questions: (1..=count)
            .map(|n| Question {
                id: format!("{key}{n}"),
                text: format!("{name} question {n}"),
                tooltip: None,
            })
            .collect(),
    };
    vec![domain("Residency", "rs", 2), domain("Portability", "pt", 4)]
}

fn small_profiles(weights: [f64; 2]) -> Vec<Profile> {
    let profile = |key: &str, weights: [f64; 2]| Profile {
        key: key.to_string(),
        name: key.to_string(),
        description: String::new(),
        icon: "fa-circle".to_string(),
        weights: BTreeMap::from([
            ("Residency".to_string(), weights[0]),
            ("Portability".to_string(), weights[1]),
        ]),
    };
    vec![
        profile(BALANCED_PROFILE, [1.0, 1.0]),
        profile("residency_first", weights),
        profile(CUSTOM_PROFILE, [1.0, 1.0]),
    ]
}

#[test]
fn catalog_sum_must_match_configured_maximum() {
    let questions = QuestionCatalog::new(small_catalog()).expect("catalog validates");
    assert_eq!(questions.max_score(), 6);
    let profiles =
        ProfileCatalog::new(small_profiles([2.0, 1.0]), &questions).expect("profiles validate");

    match Assessor::new(questions.clone(), profiles.clone(), 21) {
        Err(CatalogError::MaxScoreMismatch {
            catalog: 6,
            configured: 21,
        }) => {}
        other => panic!("expected mismatch, got {other:?}"),
    }

    let assessor = Assessor::new(questions, profiles, 6).expect("consistent catalog loads");
    let result = assessor.assess(
        &Submission::new()
            .with("profile", "residency_first")
            .with("rs1", "1")
            .with("rs2", "1")
            .with("pt1", "1")
            .with("pt2", "1")
            .with("pt3", "1")
            .with("pt4", "1"),
    );
    assert_eq!(result.max_score, 6);
    assert_eq!(result.composite_score, 6.0);
    assert_eq!(result.tier(), MaturityTier::Advanced);
}

#[test]
fn profiles_must_cover_every_domain() {
    let questions = QuestionCatalog::new(small_catalog()).expect("catalog validates");
    let mut profiles = small_profiles([2.0, 1.0]);
    profiles[1].weights.remove("Portability");

    match ProfileCatalog::new(profiles, &questions) {
        Err(CatalogError::MissingWeight { profile, domain }) => {
            assert_eq!(profile, "residency_first");
            assert_eq!(domain, "Portability");
        }
        other => panic!("expected missing weight, got {other:?}"),
    }
}

#[test]
fn profile_weights_must_stay_in_range() {
    let questions = QuestionCatalog::new(small_catalog()).expect("catalog validates");

    assert!(matches!(
        ProfileCatalog::new(small_profiles([2.5, 1.0]), &questions),
        Err(CatalogError::WeightOutOfRange { .. })
    ));
}
