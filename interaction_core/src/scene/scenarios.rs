//! End-to-end scenarios driven through `Scene` with recording hosts.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use scene_rules::{
    CinematicSettings, ColliderId, ContentLibrary, DialogueScript, ExaminableSettings, LoadMode,
    QuestAdvancePolicy, QuestData, SceneManifest, SceneTriggerSettings, SoundRef,
};

use super::*;
use crate::cinematic::{CinematicState, PlayOutcome};
use crate::interaction::FrameInput;
use crate::testing::{
    FakeAnimation, FakePhysics, RecordingAudio, RecordingControls, RecordingDialogueView,
    RecordingLoader, RecordingPromptView, RecordingSwitch,
};

const DT: f32 = 1.0 / 60.0;

struct Stage {
    scene: Scene,
    physics: FakePhysics,
    controls: RecordingControls,
    dialogue_view: RecordingDialogueView,
    prompt_view: RecordingPromptView,
    loader: RecordingLoader,
    quest_audio: RecordingAudio,
    actor_camera: RecordingSwitch,
}

fn stage(library: ContentLibrary) -> Stage {
    let physics = FakePhysics::default();
    let controls = RecordingControls::default();
    let dialogue_view = RecordingDialogueView::default();
    let prompt_view = RecordingPromptView::default();
    let loader = RecordingLoader::default();
    let quest_audio = RecordingAudio::default();
    let actor_camera = RecordingSwitch::default();

    let scene = Scene::builder()
        .with_physics(Box::new(physics.clone()))
        .with_controls(Box::new(controls.clone()))
        .with_dialogue_view(Box::new(dialogue_view.clone()))
        .with_prompt_view(Box::new(prompt_view.clone()))
        .with_loader(Box::new(loader.clone()))
        .with_quest_audio(Box::new(quest_audio.clone()), SoundRef::new("chime"))
        .with_actor_camera(Box::new(actor_camera.clone()))
        .with_library(library)
        .build();

    Stage {
        scene,
        physics,
        controls,
        dialogue_view,
        prompt_view,
        loader,
        quest_audio,
        actor_camera,
    }
}

impl Stage {
    fn cinematic(&mut self, settings: CinematicSettings) -> (CinematicId, FakeAnimation) {
        self.cinematic_with(settings, FakeAnimation::default())
    }

    fn cinematic_with(
        &mut self,
        settings: CinematicSettings,
        animation: FakeAnimation,
    ) -> (CinematicId, FakeAnimation) {
        let bindings = CinematicBindings::new(Box::new(animation.clone()));
        let id = self.scene.add_cinematic(settings, bindings).unwrap();
        (id, animation)
    }

    fn idle(&mut self) {
        self.scene.tick(&FrameInput::idle(DT));
    }

    fn confirm(&mut self) {
        self.scene.tick(&FrameInput::confirm(DT));
    }

    fn playback_log(&mut self) -> Rc<RefCell<Vec<bool>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        self.scene.subscribe(Box::new(move |event: &SceneEvent| {
            if let SceneEvent::PlaybackStateChanged { any_playing } = event {
                sink.borrow_mut().push(*any_playing);
            }
        }));
        log
    }
}

#[test]
fn test_counter_matches_sessions_in_flight() {
    let mut stage = stage(ContentLibrary::new());
    let sessions: Vec<(CinematicId, FakeAnimation)> = (0..4)
        .map(|i| stage.cinematic(CinematicSettings::new(format!("c{i}"))))
        .collect();

    for (started, (id, _)) in sessions.iter().enumerate() {
        stage.scene.play_cinematic_from_trigger(*id).unwrap();
        assert_eq!(stage.scene.playback().active() as usize, started + 1);
        assert!(stage.scene.any_cinematic_playing());
    }

    for (finished, (_, animation)) in sessions.iter().enumerate() {
        animation.finish();
        stage.idle();
        let in_flight = sessions.len() - finished - 1;
        assert_eq!(stage.scene.playback().active() as usize, in_flight);
        assert_eq!(stage.scene.any_cinematic_playing(), in_flight > 0);
    }

    // Every session handed control back
    assert!(stage.scene.controls_enabled());
    assert_eq!(stage.actor_camera.is_active(), Some(true));
}

#[test]
fn test_playback_notification_only_on_edges() {
    let mut stage = stage(ContentLibrary::new());
    let log = stage.playback_log();
    let (a, anim_a) = stage.cinematic(CinematicSettings::new("a"));
    let (b, anim_b) = stage.cinematic(CinematicSettings::new("b"));

    stage.scene.play_cinematic_from_trigger(a).unwrap();
    stage.scene.play_cinematic_from_trigger(b).unwrap();
    anim_a.finish();
    stage.idle();
    stage.scene.play_cinematic_from_trigger(a).unwrap();
    anim_a.finish();
    anim_b.finish();
    stage.idle();

    assert_eq!(*log.borrow(), vec![true, false]);

    stage.scene.play_cinematic_from_trigger(b).unwrap();
    anim_b.finish();
    stage.idle();
    assert_eq!(*log.borrow(), vec![true, false, true, false]);
}

#[test]
fn test_spent_channel_never_replays() {
    let mut stage = stage(ContentLibrary::new());
    let (id, animation) = stage.cinematic_with(
        CinematicSettings::new("broken")
            .with_clips(["a", "b"])
            .with_interaction_collider(ColliderId::new(), true)
            .advancing(),
        FakeAnimation::broken(),
    );

    assert_eq!(
        stage.scene.play_cinematic_from_interaction(id).unwrap(),
        PlayOutcome::Started
    );
    // The clip never ran and the sequence is far from done
    let cinematic = stage.scene.cinematic(id).unwrap();
    assert_eq!(cinematic.state(), CinematicState::Idle);
    assert!(!stage.scene.any_cinematic_playing());

    for _ in 0..1000 {
        assert_eq!(
            stage.scene.play_cinematic_from_interaction(id).unwrap(),
            PlayOutcome::ChannelConsumed
        );
    }
    assert_eq!(animation.played().len(), 1);
}

#[test]
fn test_clip_index_after_n_completions() {
    const CLIPS: usize = 3;

    for plays in 0..=5 {
        let mut stage = stage(ContentLibrary::new());
        let (id, animation) = stage.cinematic(
            CinematicSettings::new("slides")
                .with_clips(["one", "two", "three"])
                .advancing(),
        );

        for _ in 0..plays {
            stage.scene.play_cinematic_from_trigger(id).unwrap();
            animation.finish();
            stage.idle();
        }

        let cinematic = stage.scene.cinematic(id).unwrap();
        let expected = plays.min(CLIPS);
        assert_eq!(cinematic.current_clip_index(), expected, "after {plays} plays");
        assert_eq!(cinematic.is_completed(), expected == CLIPS, "after {plays} plays");
    }
}

#[test]
fn test_guide_dialogue_walkthrough() {
    let mut stage = stage(ContentLibrary::new());
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let script = DialogueScript::new("Guide").with_lines(["Hello", "Goodbye"]);

    assert!(stage.scene.start_dialogue(
        &script,
        true,
        Some(Box::new(move |_: &mut Completion<'_>| counter.set(counter.get() + 1))),
    ));
    assert_eq!(stage.dialogue_view.rendered(), vec!["Guide: Hello"]);
    assert!(!stage.scene.controls_enabled());

    // The router hands confirm presses to the open dialogue
    stage.confirm();
    assert_eq!(
        stage.dialogue_view.rendered(),
        vec!["Guide: Hello", "Guide: Goodbye"]
    );

    stage.confirm();
    assert!(!stage.scene.dialogue().is_open());
    assert!(stage.scene.controls_enabled());
    assert_eq!(calls.get(), 1);
    assert_eq!(stage.controls.history(), vec![false, true]);

    stage.confirm();
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_dialogue_frozen_while_cinematic_plays() {
    let mut stage = stage(ContentLibrary::new());
    let (id, animation) = stage.cinematic(CinematicSettings::new("cutscene"));
    stage.scene.start_dialogue(
        &DialogueScript::new("Guide").with_lines(["Hello", "Goodbye"]),
        false,
        None,
    );
    stage.scene.play_cinematic_from_trigger(id).unwrap();
    let renders = stage.dialogue_view.rendered().len();

    assert!(!stage.scene.advance_dialogue());
    stage.confirm();

    assert_eq!(stage.dialogue_view.rendered().len(), renders);
    assert_eq!(stage.scene.dialogue().cursor(), Some(0));

    // Starting the cinematic left the dialogue open; stopping closes it
    animation.finish();
    stage.idle();
    assert!(!stage.scene.dialogue().is_open());
}

#[test]
fn test_single_use_examinable_without_dialogue() {
    let library = ContentLibrary::new().with_quest(
        "main",
        QuestData::new("Main").with_step("Look around").with_step("Leave"),
    );
    let mut stage = stage(library.clone());
    let (quest, events) = stage.scene.quest_mut();
    quest.start_quest(library.quest("main").unwrap().clone(), 0, events);

    let collider = ColliderId::new();
    let id = stage
        .scene
        .add_examinable(
            ExaminableSettings::new("crate", collider)
                .once()
                .advancing_quest(),
        )
        .unwrap();
    stage.physics.look_at(collider);

    stage.idle();
    assert_eq!(stage.prompt_view.current().unwrap().label, "Examine");

    stage.confirm();
    assert_eq!(stage.scene.quest().step_index(), Some(1));
    assert!(stage.scene.examinable(id).unwrap().has_interacted());
    assert!(!stage.physics.is_enabled(collider));

    // The crosshair no longer finds it
    stage.confirm();
    stage.confirm();
    assert!(stage.prompt_view.current().is_none());
    let examined = stage
        .scene
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, SceneEvent::Examined { .. }))
        .count();
    assert_eq!(examined, 1);
    assert_eq!(stage.scene.quest().step_index(), Some(1));
}

#[test]
fn test_examinable_dialogue_completes_through_scene() {
    let library = ContentLibrary::new()
        .with_dialogue(
            "painting",
            DialogueScript::new("Painting").with_lines(["A portrait.", "The eyes follow you."]),
        )
        .with_quest("main", QuestData::new("Main").with_step("a").with_step("b"));
    let mut stage = stage(library.clone());
    let (quest, events) = stage.scene.quest_mut();
    quest.start_quest(library.quest("main").unwrap().clone(), 0, events);

    let collider = ColliderId::new();
    let id = stage
        .scene
        .add_examinable(
            ExaminableSettings::new("painting", collider)
                .with_dialogue("painting")
                .advancing_quest(),
        )
        .unwrap();
    stage.physics.look_at(collider);

    stage.idle();
    assert_eq!(stage.prompt_view.current().unwrap().label, "Painting");

    stage.confirm();
    assert!(stage.scene.dialogue().is_open());
    assert!(stage.scene.examinable(id).unwrap().has_interacted());
    assert_eq!(stage.scene.quest().step_index(), Some(0));

    stage.confirm();
    stage.confirm();
    assert!(!stage.scene.dialogue().is_open());
    assert!(!stage.scene.examinable(id).unwrap().has_interacted());
    assert_eq!(stage.scene.quest().step_index(), Some(1));
}

#[test]
fn test_quest_advance_clamps_and_chimes_twice() {
    let library = ContentLibrary::new().with_quest(
        "pigeons",
        QuestData::new("Pigeons")
            .with_step("Find bread")
            .with_step("Go to the square")
            .with_step("Feed them"),
    );
    let mut stage = stage(library.clone());
    let (quest, events) = stage.scene.quest_mut();
    quest.start_quest(library.quest("pigeons").unwrap().clone(), 0, events);

    for _ in 0..5 {
        let (quest, events) = stage.scene.quest_mut();
        quest.advance_step(events);
    }

    assert_eq!(stage.scene.quest().step_index(), Some(2));
    assert_eq!(stage.quest_audio.played(), vec!["chime", "chime"]);
}

#[test]
fn test_cinematic_stop_advances_quest_and_restores_control() {
    let library = ContentLibrary::new().with_quest(
        "main",
        QuestData::new("Main").with_step("Watch the news").with_step("Go out"),
    );
    let mut stage = stage(library.clone());
    let (quest, events) = stage.scene.quest_mut();
    quest.start_quest(library.quest("main").unwrap().clone(), 0, events);

    let collider = ColliderId::new();
    let (id, animation) = stage.cinematic(
        CinematicSettings::new("tv")
            .with_label("Watch")
            .with_interaction_collider(collider, false)
            .with_quest_policy(QuestAdvancePolicy::always()),
    );
    stage.physics.look_at(collider);

    stage.confirm();
    assert!(stage.scene.cinematic(id).unwrap().is_playing());
    assert!(!stage.scene.controls_enabled());
    assert_eq!(stage.actor_camera.is_active(), Some(false));

    // Confirm presses during playback do nothing
    stage.confirm();
    assert_eq!(animation.played().len(), 1);
    assert!(stage.prompt_view.current().is_none());

    animation.finish();
    stage.idle();
    assert_eq!(stage.scene.quest().step_index(), Some(1));
    assert!(stage.scene.controls_enabled());
    assert_eq!(stage.actor_camera.is_active(), Some(true));

    stage.idle();
    assert_eq!(stage.prompt_view.current().unwrap().label, "Watch");
}

#[test]
fn test_trigger_entry_plays_cinematic_and_loads_scene() {
    let mut stage = stage(ContentLibrary::new());
    let volume = ColliderId::new();
    let exit = ColliderId::new();
    let (id, _) = stage.cinematic(CinematicSettings::new("ambush").with_trigger_collider(volume, true));
    stage.scene.add_scene_trigger(SceneTriggerSettings::new(
        "exit",
        exit,
        Some("Street".into()),
    ));

    stage.scene.on_trigger_enter(volume, false);
    assert!(!stage.scene.any_cinematic_playing());

    stage.scene.on_trigger_enter(volume, true);
    assert!(stage.scene.cinematic(id).unwrap().is_playing());

    stage.scene.on_trigger_enter(exit, true);
    stage.scene.on_trigger_enter(exit, true);
    assert_eq!(
        stage.loader.loads(),
        vec![("Street".to_string(), LoadMode::Background)]
    );
}

#[test]
fn test_disabled_cinematic_is_unreachable() {
    let mut stage = stage(ContentLibrary::new());
    let collider = ColliderId::new();
    let volume = ColliderId::new();
    let (id, _) = stage.cinematic(
        CinematicSettings::new("tv")
            .with_interaction_collider(collider, false)
            .with_trigger_collider(volume, false),
    );

    stage.scene.set_cinematic_enabled(id, false).unwrap();
    stage.scene.set_cinematic_enabled(id, false).unwrap();
    assert!(stage.scene.registry().is_empty());
    stage.scene.on_trigger_enter(volume, true);
    assert!(!stage.scene.any_cinematic_playing());

    stage.scene.set_cinematic_enabled(id, true).unwrap();
    assert!(stage.scene.registry().cinematic_for(collider).is_some());
    assert!(stage.physics.is_enabled(collider));
}

#[test]
fn test_disabled_cinematic_keeps_its_collider() {
    let mut stage = stage(ContentLibrary::new());
    let collider = ColliderId::new();
    let volume = ColliderId::new();
    let (id, _) = stage.cinematic(
        CinematicSettings::new("tv")
            .with_interaction_collider(collider, false)
            .with_trigger_collider(volume, false),
    );
    stage.scene.set_cinematic_enabled(id, false).unwrap();

    let remote = stage
        .scene
        .add_examinable(ExaminableSettings::new("remote", collider));
    assert!(matches!(
        remote,
        Err(SceneError::ColliderAlreadyRegistered(c)) if c == collider
    ));
    let zoom = stage.scene.add_cinematic(
        CinematicSettings::new("tv_zoom").with_interaction_collider(collider, false),
        CinematicBindings::new(Box::new(FakeAnimation::default())),
    );
    assert!(matches!(zoom, Err(SceneError::ColliderAlreadyRegistered(_))));
    assert!(stage.scene.examinable_by_name("remote").is_none());
    assert!(stage.scene.cinematic_by_name("tv_zoom").is_none());

    stage.scene.set_cinematic_enabled(id, true).unwrap();
    let registration = stage.scene.registry().cinematic_for(collider).unwrap();
    assert_eq!(registration.target, id);
    assert!(stage.physics.is_enabled(collider));
    assert!(stage.physics.is_enabled(volume));

    stage.scene.set_cinematic_enabled(id, false).unwrap();
    assert!(!stage.physics.is_enabled(collider));
    assert!(stage.scene.registry().is_empty());
}

#[test]
fn test_reenabled_completed_cinematic_stays_dark() {
    let mut stage = stage(ContentLibrary::new());
    let collider = ColliderId::new();
    let volume = ColliderId::new();
    let (id, animation) = stage.cinematic(
        CinematicSettings::new("slides")
            .with_clips(["only"])
            .advancing()
            .with_interaction_collider(collider, false)
            .with_trigger_collider(volume, false),
    );

    stage.scene.play_cinematic_from_trigger(id).unwrap();
    animation.finish();
    stage.idle();
    assert!(stage.scene.cinematic(id).unwrap().is_completed());
    assert!(!stage.physics.is_enabled(collider));

    stage.scene.set_cinematic_enabled(id, false).unwrap();
    stage.scene.set_cinematic_enabled(id, true).unwrap();

    assert!(stage.scene.registry().cinematic_for(collider).is_some());
    assert!(!stage.physics.is_enabled(collider));
    assert!(!stage.physics.is_enabled(volume));
}

#[test]
fn test_examinable_toggle_and_duplicate_collider() {
    let mut stage = stage(ContentLibrary::new());
    let collider = ColliderId::new();
    let id = stage
        .scene
        .add_examinable(ExaminableSettings::new("vase", collider))
        .unwrap();

    let duplicate = stage
        .scene
        .add_cinematic(
            CinematicSettings::new("vase_zoom").with_interaction_collider(collider, false),
            CinematicBindings::new(Box::new(FakeAnimation::default())),
        );
    assert!(matches!(
        duplicate,
        Err(SceneError::ColliderAlreadyRegistered(c)) if c == collider
    ));

    stage.scene.set_examinable_enabled(id, false).unwrap();
    stage.physics.look_at(collider);
    stage.confirm();
    assert!(!stage.scene.examinable(id).unwrap().has_interacted());

    stage.scene.set_examinable_enabled(id, true).unwrap();
    stage.scene.set_examinable_enabled(id, true).unwrap();
    assert_eq!(stage.scene.registry().len(), 1);

    let unknown = stage.scene.set_examinable_enabled(ExaminableId::new(), true);
    assert!(matches!(unknown, Err(SceneError::UnknownExaminable(_))));
}

#[test]
fn test_timed_and_signal_events_reach_subscribers() {
    let mut stage = stage(ContentLibrary::new());
    let (id, animation) = stage.cinematic(
        CinematicSettings::new("fireworks")
            .with_timed_event(scene_rules::TimedEventSettings::new("bang", 0.05)),
    );
    let heard = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&heard);
    stage.scene.subscribe(Box::new(move |event: &SceneEvent| match event {
        SceneEvent::TimedEvent { name, .. } | SceneEvent::CinematicSignal { name, .. } => {
            sink.borrow_mut().push(name.clone())
        }
        _ => {}
    }));

    stage.scene.play_cinematic_from_trigger(id).unwrap();
    stage
        .scene
        .dispatch_animation_event(id, AnimationEvent::Signal("sparks".into()))
        .unwrap();
    stage
        .scene
        .dispatch_animation_event(id, AnimationEvent::TriggerTimedEvent(0))
        .unwrap();
    for _ in 0..5 {
        stage.idle();
    }
    animation.finish();
    stage.idle();

    assert_eq!(*heard.borrow(), vec!["sparks", "bang"]);
    assert!(!stage
        .scene
        .dispatch_animation_event(id, AnimationEvent::Signal("late".into()))
        .unwrap());
}

const MANIFEST: &str = r#"
    [content.dialogues.painting]
    speaker = "Painting"
    lines = ["A portrait of the founder."]

    [content.quests.main]
    name = "Main"
    steps = ["Explore the hall", "Open the vault", "Leave"]

    [starting_quest]
    key = "main"
    step = 1

    [[cinematics]]
    name = "vault_door"
    label = "Open"
    interaction_collider = "7a8a0f55-3a57-4f4b-9b8b-3f5c9d1c2e01"

    [cinematics.quest]
    advance_on_stop = true

    [[examinables]]
    name = "painting"
    collider = "7a8a0f55-3a57-4f4b-9b8b-3f5c9d1c2e02"
    dialogue = "painting"

    [[scene_triggers]]
    name = "exit"
    collider = "7a8a0f55-3a57-4f4b-9b8b-3f5c9d1c2e03"
    scene_name = "Street"
"#;

#[test]
fn test_build_from_manifest() {
    let manifest = SceneManifest::from_toml_str(MANIFEST).unwrap();
    let animation = FakeAnimation::default();
    let mut bindings = HashMap::new();
    bindings.insert(
        "vault_door".to_string(),
        CinematicBindings::new(Box::new(animation.clone())),
    );

    let mut scene = Scene::builder()
        .build_from_manifest(manifest, bindings)
        .unwrap();

    assert_eq!(scene.quest().step_text(), Some("Open the vault"));
    assert_eq!(
        scene.examinable_by_name("painting").unwrap().label(),
        Some("Painting")
    );
    assert_eq!(scene.registry().len(), 2);

    let door = scene.cinematic_by_name("vault_door").unwrap().id();
    scene.play_cinematic_from_interaction(door).unwrap();
    animation.finish();
    scene.tick(&FrameInput::idle(DT));
    assert_eq!(scene.quest().step_text(), Some("Leave"));
}

#[test]
fn test_manifest_without_bindings_fails() {
    let manifest = SceneManifest::from_toml_str(MANIFEST).unwrap();

    let result = Scene::builder().build_from_manifest(manifest, HashMap::new());

    assert!(matches!(result, Err(SceneError::MissingBindings(name)) if name == "vault_door"));
}
