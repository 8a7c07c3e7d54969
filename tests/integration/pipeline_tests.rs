/*!
 * End-to-end pipeline tests with in-memory collaborators
 */

use std::fs;
use std::path::Path;
use std::sync::Arc;

use reelwright::app_config::Config;
use reelwright::providers::mock::{MockReply, MockSynthesizer, MockTextGenerator};
use reelwright::timeline::LayerKind;
use reelwright::{Collaborators, Controller, ScriptRequest, VoicedScript};

use crate::common::mock_media::{FixedProbe, RecordingCompositor};
use crate::common::{
    create_temp_dir, create_test_file, init_test_logger, sample_quiz_json, sample_registry,
    sample_script_json,
};

/// Config whose working paths all live under `root`
fn config_in(root: &Path) -> Config {
    let mut config = Config::default();
    config.paths.characters_file = root.join("characters.json");
    config.paths.backgrounds_dir = root.join("backgrounds");
    config.paths.audio_dir = root.join("audio");
    config.paths.posted_dir = root.join("posted");
    config.paths.quizzes_dir = root.join("quizzes");
    config.paths.output_file = root.join("final_video.mp4");
    config.paths.script_file = root.join("final_script.json");
    config
}

fn prepare_backgrounds(root: &Path) {
    init_test_logger();
    let backgrounds = root.join("backgrounds");
    fs::create_dir_all(&backgrounds).unwrap();
    create_test_file(&backgrounds, "parkour.mp4", "bg").unwrap();
}

/// A full run writes the script, renders, archives, clears audio and saves a quiz
#[tokio::test]
async fn test_run_withMockCollaborators_shouldProduceArchivedVideoAndQuiz() {
    let dir = create_temp_dir().unwrap();
    let root = dir.path();
    prepare_backgrounds(root);
    let posted = root.join("posted");
    fs::create_dir_all(&posted).unwrap();
    create_test_file(&posted, "001.mp4", "earlier video").unwrap();

    let text = Arc::new(MockTextGenerator::new(vec![
        MockReply::Text(sample_script_json("tides")),
        MockReply::Text(sample_quiz_json()),
    ]));
    let compositor = Arc::new(RecordingCompositor::new());
    let collaborators = Collaborators {
        text: text.clone(),
        speech: Arc::new(MockSynthesizer::new()),
        probe: Arc::new(FixedProbe::new(2.0, (1920, 1080))),
        compositor: compositor.clone(),
    };

    let controller = Controller::with_collaborators(config_in(root), sample_registry(), collaborators);
    let summary = controller
        .run(ScriptRequest::new("tides", 30, "Peter", "Stewie"))
        .await
        .unwrap();

    // Archive
    assert_eq!(summary.video_path, posted.join("002.mp4"));
    assert!(summary.video_path.exists());
    assert!(!root.join("final_video.mp4").exists());
    assert_eq!(summary.duration_secs, 6.0);

    // Scratch audio is cleared after archiving
    let leftover = fs::read_dir(root.join("audio")).unwrap().count();
    assert_eq!(leftover, 0);

    // Voiced script on disk
    let saved = VoicedScript::load(root.join("final_script.json")).unwrap();
    assert_eq!(saved.dialogue.len(), 3);
    assert_eq!(saved.dialogue[0].audio_duration_secs, 2.0);

    // Render received the assembled timeline
    let rendered = compositor.rendered();
    assert_eq!(rendered.len(), 1);
    let (timeline, output) = &rendered[0];
    assert_eq!(output, &root.join("final_video.mp4"));
    assert_eq!(timeline.total_duration, 6.0);
    assert_eq!(timeline.count_of(LayerKind::Background), 1);
    assert_eq!(timeline.count_of(LayerKind::Title), 1);
    assert_eq!(timeline.count_of(LayerKind::Portrait), 3);
    assert!(timeline.layers_within_bounds());

    // Quiz
    let quiz_path = summary.quiz_path.unwrap();
    assert_eq!(quiz_path, root.join("quizzes").join("002.json"));
    assert!(quiz_path.exists());
    assert_eq!(text.request_count(), 2);
    assert!(text.prompts()[1].contains("002.mp4"));
}

/// With quizzes disabled only the script request is made
#[tokio::test]
async fn test_run_withQuizDisabled_shouldSkipQuiz() {
    let dir = create_temp_dir().unwrap();
    let root = dir.path();
    prepare_backgrounds(root);

    let mut config = config_in(root);
    config.quiz.enabled = false;

    let text = Arc::new(MockTextGenerator::always(sample_script_json("tides")));
    let collaborators = Collaborators {
        text: text.clone(),
        speech: Arc::new(MockSynthesizer::new()),
        probe: Arc::new(FixedProbe::new(1.5, (1080, 1920))),
        compositor: Arc::new(RecordingCompositor::new()),
    };

    let controller = Controller::with_collaborators(config, sample_registry(), collaborators);
    let summary = controller
        .run(ScriptRequest::new("tides", 30, "Peter", "Stewie"))
        .await
        .unwrap();

    assert_eq!(summary.video_path, root.join("posted").join("001.mp4"));
    assert!(summary.quiz_path.is_none());
    assert_eq!(text.request_count(), 1);
}

/// A failed render leaves nothing archived
#[tokio::test]
async fn test_run_withFailingCompositor_shouldNotArchive() {
    let dir = create_temp_dir().unwrap();
    let root = dir.path();
    prepare_backgrounds(root);

    let collaborators = Collaborators {
        text: Arc::new(MockTextGenerator::always(sample_script_json("tides"))),
        speech: Arc::new(MockSynthesizer::new()),
        probe: Arc::new(FixedProbe::new(1.0, (1920, 1080))),
        compositor: Arc::new(RecordingCompositor::failing()),
    };

    let controller = Controller::with_collaborators(config_in(root), sample_registry(), collaborators);
    let result = controller
        .run(ScriptRequest::new("tides", 30, "Peter", "Stewie"))
        .await;

    tokio_test::assert_err!(result);
    assert!(!root.join("posted").exists());
}

/// A run without backgrounds fails after voicing
#[tokio::test]
async fn test_run_withoutBackgrounds_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let root = dir.path();

    let collaborators = Collaborators {
        text: Arc::new(MockTextGenerator::always(sample_script_json("tides"))),
        speech: Arc::new(MockSynthesizer::new()),
        probe: Arc::new(FixedProbe::new(1.0, (1920, 1080))),
        compositor: Arc::new(RecordingCompositor::new()),
    };

    let controller = Controller::with_collaborators(config_in(root), sample_registry(), collaborators);
    let err = controller
        .run(ScriptRequest::new("tides", 30, "Peter", "Stewie"))
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("Background directory"));
}

/// Assembling from a saved script gives the same timeline as the pipeline
#[tokio::test]
async fn test_assemble_from_script_shouldReadSavedScript() {
    let dir = create_temp_dir().unwrap();
    let root = dir.path();

    let script = VoicedScript {
        topic: "foxes".to_string(),
        length_seconds: 15,
        dialogue: crate::common::sample_dialogue(),
    };
    let script_path = root.join("final_script.json");
    script.save(&script_path).unwrap();

    let collaborators = Collaborators {
        text: Arc::new(MockTextGenerator::failing()),
        speech: Arc::new(MockSynthesizer::new()),
        probe: Arc::new(FixedProbe::new(1.0, (1920, 1080))),
        compositor: Arc::new(RecordingCompositor::new()),
    };
    let controller = Controller::with_collaborators(config_in(root), sample_registry(), collaborators);

    let timeline = controller
        .assemble_from_script(&script_path, Path::new("bg.mp4"))
        .await
        .unwrap();

    assert_eq!(timeline.total_duration, 10.5);
    assert_eq!(timeline.count_of(LayerKind::Portrait), 3);
    assert_eq!(timeline.count_of(LayerKind::Caption), 6);
}
