/*!
 * Tests for timeline layer assembly
 */

use reelwright::errors::TimelineError;
use reelwright::timeline::{
    BackgroundSource, Layer, LayerKind, LayoutConfig, Span, TimelineAssembler,
};

use crate::common::{dialogue_line, sample_dialogue, sample_registry};

fn background() -> BackgroundSource {
    BackgroundSource::new("backgrounds/minecraft.mp4", 1920, 1080)
}

/// Layers come out bottom to top: background, title, portraits, captions
#[test]
fn test_assemble_withSampleDialogue_shouldOrderLayersByZ() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();
    let assembler = TimelineAssembler::new(&registry, &layout);

    let timeline = assembler
        .assemble("Why foxes jump", &background(), &sample_dialogue())
        .unwrap();

    let kinds: Vec<LayerKind> = timeline.layers.iter().map(Layer::kind).collect();
    assert_eq!(kinds[0], LayerKind::Background);
    assert_eq!(kinds[1], LayerKind::Title);
    let first_caption = kinds.iter().position(|k| *k == LayerKind::Caption).unwrap();
    assert!(kinds[2..first_caption].iter().all(|k| *k == LayerKind::Portrait));
    assert!(kinds[first_caption..].iter().all(|k| *k == LayerKind::Caption));
}

/// One portrait per line, spanning the line, with the speaker's image
#[test]
fn test_assemble_shouldCreateOnePortraitPerLine() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();
    let timeline = TimelineAssembler::new(&registry, &layout)
        .assemble("topic", &background(), &sample_dialogue())
        .unwrap();

    let portraits: Vec<_> = timeline
        .layers
        .iter()
        .filter_map(|layer| match layer {
            Layer::Portrait(p) => Some(p),
            _ => None,
        })
        .collect();

    assert_eq!(portraits.len(), 3);
    assert_eq!(portraits[0].span, Span::new(0.0, 5.0));
    assert_eq!(portraits[1].span, Span::new(5.0, 7.0));
    assert_eq!(portraits[2].span, Span::new(7.0, 10.5));
    assert_eq!(portraits[1].speaker, "Stewie");
    assert_eq!(portraits[1].image.to_str(), Some("images/stewie.png"));
    assert_eq!(portraits[0].width, layout.portrait_width);
    assert_eq!(portraits[0].placement.top, layout.portrait_top());
}

/// Background and title cover the whole video
#[test]
fn test_assemble_shouldSpanBackgroundAndTitleOverWholeVideo() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();
    let timeline = TimelineAssembler::new(&registry, &layout)
        .assemble("  Why foxes jump  ", &background(), &sample_dialogue())
        .unwrap();

    assert_eq!(timeline.total_duration, 10.5);
    assert_eq!(timeline.layers[0].span(), Span::new(0.0, 10.5));
    match &timeline.layers[1] {
        Layer::Title(title) => {
            assert_eq!(title.span, Span::new(0.0, 10.5));
            assert_eq!(title.text, "Why foxes jump");
            assert_eq!(title.font_size, layout.title_font_size);
        }
        other => panic!("expected title layer, got {:?}", other),
    }
}

/// Caption colours come from the speaking character
#[test]
fn test_assemble_shouldColourCaptionsBySpeaker() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();
    let timeline = TimelineAssembler::new(&registry, &layout)
        .assemble("topic", &background(), &sample_dialogue())
        .unwrap();

    let captions: Vec<_> = timeline
        .layers
        .iter()
        .filter_map(|layer| match layer {
            Layer::Caption(c) => Some(c),
            _ => None,
        })
        .collect();

    // 5 + 4 + 5 words at 3 words per chunk
    assert_eq!(captions.len(), 2 + 2 + 2);
    assert_eq!(captions[0].text, "the quick brown");
    assert_eq!(captions[0].color, "white");
    assert_eq!(captions[2].color, "yellow");
    assert_eq!(captions[2].span.start, 5.0);
    assert_eq!(captions[0].placement.top, layout.caption_top());
}

/// A blank topic is rejected instead of drawing an empty title
#[test]
fn test_assemble_withBlankTopic_shouldRejectInput() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();
    let result = TimelineAssembler::new(&registry, &layout).assemble("   ", &background(), &sample_dialogue());

    assert!(matches!(result, Err(TimelineError::InvalidInput(_))));
}

/// Every layer lies within the video and the audio track follows line order
#[test]
fn test_assemble_shouldKeepLayersInBoundsAndAudioInOrder() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();
    let lines = sample_dialogue();
    let timeline = TimelineAssembler::new(&registry, &layout)
        .assemble("topic", &background(), &lines)
        .unwrap();

    assert!(timeline.layers_within_bounds());
    let expected: Vec<_> = lines.iter().map(|l| l.audio_path.clone()).collect();
    assert_eq!(timeline.audio_track, expected);
    assert_eq!(timeline.canvas_width, 1080);
    assert_eq!(timeline.canvas_height, 1920);
}

/// The background is cover-fitted to the canvas
#[test]
fn test_assemble_shouldCoverFitBackground() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();
    let timeline = TimelineAssembler::new(&registry, &layout)
        .assemble("topic", &background(), &sample_dialogue())
        .unwrap();

    match &timeline.layers[0] {
        Layer::Background(bg) => {
            assert_eq!(bg.fit.scaled_height, 1920);
            assert!(bg.fit.scaled_width >= 1080);
            assert_eq!(bg.fit.crop_width, 1080);
            assert_eq!(bg.fit.crop_height, 1920);
        }
        other => panic!("expected background layer, got {:?}", other),
    }
}

/// An unknown speaker fails the whole assembly
#[test]
fn test_assemble_withUnknownSpeaker_shouldFailWithoutTimeline() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();
    let mut lines = sample_dialogue();
    lines.push(dialogue_line(3, "Brian", "I am not registered", 1.0));

    let result = TimelineAssembler::new(&registry, &layout).assemble("topic", &background(), &lines);

    assert_eq!(result, Err(TimelineError::UnknownCharacter("Brian".to_string())));
}

/// Empty dialogue is rejected
#[test]
fn test_assemble_withNoLines_shouldFailWithEmptyDialogue() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();

    let result = TimelineAssembler::new(&registry, &layout).assemble("topic", &background(), &[]);

    assert_eq!(result, Err(TimelineError::EmptyDialogue));
}

/// A bad layout is rejected before anything is built
#[test]
fn test_assemble_withInvalidLayout_shouldFail() {
    let registry = sample_registry();
    let layout = LayoutConfig {
        words_per_chunk: 0,
        ..LayoutConfig::default()
    };

    let result = TimelineAssembler::new(&registry, &layout).assemble("topic", &background(), &sample_dialogue());

    assert!(matches!(result, Err(TimelineError::InvalidInput(_))));
}

/// The same input serializes to the same bytes
#[test]
fn test_assemble_twice_shouldBeDeterministic() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();
    let assembler = TimelineAssembler::new(&registry, &layout);

    let first = assembler.assemble("topic", &background(), &sample_dialogue()).unwrap();
    let second = assembler.assemble("topic", &background(), &sample_dialogue()).unwrap();

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

/// Layers serialize with a `kind` tag
#[test]
fn test_timeline_json_shouldTagLayerKinds() {
    let registry = sample_registry();
    let layout = LayoutConfig::default();
    let timeline = TimelineAssembler::new(&registry, &layout)
        .assemble("topic", &background(), &sample_dialogue())
        .unwrap();

    let json = serde_json::to_value(&timeline).unwrap();
    assert_eq!(json["layers"][0]["kind"], "background");
    assert_eq!(json["layers"][1]["kind"], "title");
    assert_eq!(json["layers"][2]["kind"], "portrait");
}
