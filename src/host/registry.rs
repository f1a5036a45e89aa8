//! Instance registry - every game living on one page, keyed by instance id

use crate::activity::context::RenderContext;
use crate::activity::extract::{extract_config, ActivityRecord, GameSettings};
use crate::battleships::game::BattleshipsGame;
use crate::core::config::{config, EngineConfig};
use crate::core::error::{ArcadeError, Result};
use crate::core::types::{InstanceId, Millis};
use crate::engine::{CompletionSink, MiniGame};
use crate::memory::game::MemoryMatchGame;
use ahash::AHashMap;

/// A running game of any supported variant
#[derive(Debug)]
pub enum GameInstance {
    Battleships(Box<BattleshipsGame>),
    MemoryMatch(Box<MemoryMatchGame>),
}

impl GameInstance {
    pub fn as_game(&self) -> &dyn MiniGame {
        match self {
            GameInstance::Battleships(g) => g.as_ref(),
            GameInstance::MemoryMatch(g) => g.as_ref(),
        }
    }

    pub fn as_game_mut(&mut self) -> &mut dyn MiniGame {
        match self {
            GameInstance::Battleships(g) => g.as_mut(),
            GameInstance::MemoryMatch(g) => g.as_mut(),
        }
    }

    pub fn battleships(&self) -> Option<&BattleshipsGame> {
        match self {
            GameInstance::Battleships(g) => Some(g.as_ref()),
            _ => None,
        }
    }

    pub fn battleships_mut(&mut self) -> Option<&mut BattleshipsGame> {
        match self {
            GameInstance::Battleships(g) => Some(g.as_mut()),
            _ => None,
        }
    }

    pub fn memory(&self) -> Option<&MemoryMatchGame> {
        match self {
            GameInstance::MemoryMatch(g) => Some(g.as_ref()),
            _ => None,
        }
    }

    pub fn memory_mut(&mut self) -> Option<&mut MemoryMatchGame> {
        match self {
            GameInstance::MemoryMatch(g) => Some(g.as_mut()),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct InstanceEntry {
    pub context: RenderContext,
    pub game: GameInstance,
    /// Presentation only; never touches game state
    pub fullscreen: bool,
}

/// Owns every live instance. Replaces a page-global namespace of handles.
#[derive(Debug)]
pub struct InstanceRegistry {
    engine: EngineConfig,
    instances: AHashMap<InstanceId, InstanceEntry>,
}

impl Default for InstanceRegistry {
    /// Uses the process-wide engine config
    fn default() -> Self {
        Self::new(config().clone())
    }
}

impl InstanceRegistry {
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            engine,
            instances: AHashMap::new(),
        }
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Build the game an activity record asks for and register it
    pub fn spawn<S>(&mut self, record: &ActivityRecord, sink: S) -> Result<InstanceId>
    where
        S: CompletionSink + 'static,
    {
        let context = RenderContext::from_record(record);
        let id = context.instance_id.clone();
        if self.instances.contains_key(&id) {
            return Err(ArcadeError::DuplicateInstance(id.to_string()));
        }

        let config = extract_config(record);
        let sink: Box<dyn CompletionSink> = Box::new(sink);
        let engine = self.engine.clone();
        let questions = config.questions.clone();
        let game = match config.settings {
            GameSettings::Battleships(settings) => GameInstance::Battleships(Box::new(
                BattleshipsGame::new(id.clone(), settings, questions, engine, config.seed, sink),
            )),
            GameSettings::MemoryMatch(settings) => GameInstance::MemoryMatch(Box::new(
                MemoryMatchGame::new(id.clone(), settings, questions, engine, config.seed, sink),
            )),
            GameSettings::Unsupported => {
                tracing::warn!(
                    instance = %id,
                    game_type = context.game_type.name(),
                    "No engine for activity type"
                );
                return Err(ArcadeError::UnsupportedGame(
                    context.game_type.name().to_string(),
                ));
            }
        };

        tracing::info!(instance = %id, game_type = context.game_type.name(), "Spawned game");
        self.instances.insert(
            id.clone(),
            InstanceEntry {
                context,
                game,
                fullscreen: false,
            },
        );
        Ok(id)
    }

    pub fn get(&self, id: &InstanceId) -> Option<&InstanceEntry> {
        self.instances.get(id)
    }

    pub fn get_mut(&mut self, id: &InstanceId) -> Option<&mut InstanceEntry> {
        self.instances.get_mut(id)
    }

    fn entry_mut(&mut self, id: &InstanceId) -> Result<&mut InstanceEntry> {
        self.instances
            .get_mut(id)
            .ok_or_else(|| ArcadeError::InstanceNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.instances.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn remove(&mut self, id: &InstanceId) -> Option<InstanceEntry> {
        self.instances.remove(id)
    }

    pub fn restart(&mut self, id: &InstanceId) -> Result<()> {
        let entry = self.entry_mut(id)?;
        entry.game.as_game_mut().restart();
        tracing::debug!(instance = %id, "Restarted game");
        Ok(())
    }

    pub fn advance(&mut self, id: &InstanceId, elapsed: Millis) -> Result<()> {
        self.entry_mut(id)?.game.as_game_mut().advance(elapsed);
        Ok(())
    }

    /// Advance logical time for every instance
    pub fn advance_all(&mut self, elapsed: Millis) {
        for entry in self.instances.values_mut() {
            entry.game.as_game_mut().advance(elapsed);
        }
    }

    /// Flip full-screen presentation; allowed even while input is locked.
    /// Returns the new state.
    pub fn toggle_fullscreen(&mut self, id: &InstanceId) -> Result<bool> {
        let entry = self.entry_mut(id)?;
        entry.fullscreen = !entry.fullscreen;
        Ok(entry.fullscreen)
    }
}
