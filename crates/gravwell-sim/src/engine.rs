//! Simulation engine: the core of the duel.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `GameSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gravwell_core::commands::PlayerCommand;
use gravwell_core::components::{Body, Craft, Projectile};
use gravwell_core::config::SimConfig;
use gravwell_core::constants::{
    MIN_LAUNCH_SPEED, MISSILE_THRUST_FORCE, MUZZLE_OFFSET, PREVIEW_MAX_STEPS,
};
use gravwell_core::enums::{RoundPhase, WeaponKind};
use gravwell_core::error::SimError;
use gravwell_core::events::SimEvent;
use gravwell_core::homing::HomingResult;
use gravwell_core::state::GameSnapshot;
use gravwell_core::timing::TimingPolicy;
use gravwell_core::types::{PlayerId, SimTime, Vector2D};

use crate::systems;
use crate::trajectory::{predict_path, Launch, PreviewGuidance};
use crate::world_setup::{self, SerialCounter};

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: SimConfig,
    time: SimTime,
    phase: RoundPhase,
    rng: ChaCha8Rng,
    serials: SerialCounter,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Validate `config` and set up the first round.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut engine = Self {
            world: World::new(),
            time: SimTime::default(),
            phase: RoundPhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            serials: SerialCounter::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            config,
        };
        engine.start_round()?;
        Ok(engine)
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply queued commands without advancing the simulation. Events they
    /// raise are reported by the next `tick`.
    pub fn apply_commands(&mut self) {
        self.process_commands();
    }

    /// Advance the simulation by `delta_ms` and return the resulting snapshot.
    ///
    /// The delta is clamped to `[0, max_delta_ms]`; negative and NaN deltas
    /// count as zero.
    pub fn tick(&mut self, delta_ms: f64) -> GameSnapshot {
        let dt = delta_ms.max(0.0).min(self.config.max_delta_ms);

        self.process_commands();

        if self.phase == RoundPhase::Active {
            self.run_systems(dt);
            self.time.advance(dt);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            (self.config.arena_width, self.config.arena_height),
            events,
        )
    }

    /// Get the current round phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Last planner output of a homing projectile, for visualization.
    pub fn homing_result(&self, projectile: Entity) -> Option<HomingResult> {
        let projectile = self.world.get::<&Projectile>(projectile).ok()?;
        projectile.guidance.as_ref()?.last_result.clone()
    }

    /// Predicted path of the shot `player` would fire right now with the
    /// selected weapon. Homing weapons steer toward the live opponent.
    /// `None` if that craft is gone.
    pub fn preview_shot(&self, player: PlayerId) -> Option<Vec<Vector2D>> {
        let (entity, launch) = self.muzzle(player)?;
        let weapon = self.world.get::<&Craft>(entity).ok()?.weapon;
        let opponent = player.opponent();
        let target = self
            .world
            .query::<(&Body, &Craft)>()
            .iter()
            .find(|(_, (body, craft))| craft.player == opponent && !body.destroyed)
            .map(|(_, (body, _))| body.position);
        let guidance = TimingPolicy::for_weapon(weapon).map(|policy| PreviewGuidance {
            policy,
            thrust_force: MISSILE_THRUST_FORCE,
            target,
        });

        let wells = systems::well_snapshots(&self.world);
        let path = predict_path(
            launch,
            guidance,
            &wells,
            &self.config.trajectory_params(),
            (self.config.arena_width, self.config.arena_height),
            PREVIEW_MAX_STEPS,
        );
        Some(path.collect())
    }

    /// Add a well to the arena.
    pub fn spawn_well(
        &mut self,
        position: Vector2D,
        velocity: Vector2D,
        radius: f64,
    ) -> Result<Entity, SimError> {
        Ok(world_setup::spawn_well(
            &mut self.world,
            &mut self.serials,
            position,
            velocity,
            radius,
        )?)
    }

    /// Add a projectile without spending ammunition. Homing variants target
    /// the owner's opponent.
    pub fn spawn_projectile(
        &mut self,
        owner: PlayerId,
        weapon: WeaponKind,
        launch: Launch,
    ) -> Result<Entity, SimError> {
        Ok(world_setup::spawn_projectile(
            &mut self.world,
            &mut self.serials,
            owner,
            weapon,
            launch,
            Some(owner.opponent()),
        )?)
    }

    /// Tear down the world and generate a fresh round from the engine's RNG.
    fn start_round(&mut self) -> Result<(), SimError> {
        self.world.clear();
        world_setup::setup_round(
            &mut self.world,
            &mut self.rng,
            &mut self.serials,
            &self.config,
        )?;
        self.time = SimTime::default();
        self.phase = RoundPhase::Active;
        info!(
            "round started: seed={} wells={}",
            self.config.seed,
            systems::live_wells(&self.world).len()
        );
        Ok(())
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SetAim {
                player,
                angle,
                power,
            } => {
                for (_entity, craft) in self.world.query_mut::<&mut Craft>() {
                    if craft.player == player && !craft.set_aim(angle, power) {
                        warn!("{player} aim ignored: angle={angle} power={power}");
                    }
                }
            }
            PlayerCommand::SelectWeapon { player, weapon } => {
                for (_entity, craft) in self.world.query_mut::<&mut Craft>() {
                    if craft.player == player {
                        craft.select_weapon(weapon);
                    }
                }
            }
            PlayerCommand::Fire { player } => self.fire(player),
            PlayerCommand::ResetRound => {
                if let Err(e) = self.start_round() {
                    warn!("round reset failed: {e}");
                }
            }
        }
    }

    /// Muzzle launch state of `player`'s craft with its entity, if it is alive.
    fn muzzle(&self, player: PlayerId) -> Option<(Entity, Launch)> {
        let mut query = self.world.query::<(&Body, &Craft)>();
        let (entity, (body, craft)) = query
            .iter()
            .find(|(_, (body, craft))| craft.player == player && !body.destroyed)?;
        let speed = craft.aim_power.max(MIN_LAUNCH_SPEED);
        let launch = Launch {
            position: body.position
                + Vector2D::from_angle(craft.aim_angle, body.radius() + MUZZLE_OFFSET),
            velocity: Vector2D::from_angle(craft.aim_angle, speed),
        };
        Some((entity, launch))
    }

    fn refuse_fire(&mut self, player: PlayerId, weapon: Option<WeaponKind>) {
        self.events.push(SimEvent::FireRefused { player, weapon });
    }

    fn fire(&mut self, player: PlayerId) {
        let Some((entity, launch)) = self.muzzle(player) else {
            warn!("{player} cannot fire: no live craft");
            let weapon = self
                .world
                .query::<&Craft>()
                .iter()
                .find(|(_, craft)| craft.player == player)
                .map(|(_, craft)| craft.weapon);
            self.refuse_fire(player, weapon);
            return;
        };
        let Ok(weapon) = self.world.get::<&Craft>(entity).map(|craft| craft.weapon) else {
            return;
        };
        if self.phase != RoundPhase::Active {
            warn!("{player} fire refused: round is over");
            self.refuse_fire(player, Some(weapon));
            return;
        }

        // Validate the launch before any ammunition is spent.
        let body = match Projectile::body(weapon, launch.position, launch.velocity) {
            Ok(body) => body,
            Err(e) => {
                warn!("{player} shot rejected: {e}");
                self.refuse_fire(player, Some(weapon));
                return;
            }
        };

        let spent = self
            .world
            .get::<&mut Craft>(entity)
            .map(|mut craft| craft.consume_ammo())
            .unwrap_or(false);
        if !spent {
            warn!("{player} fire refused: {weapon:?} magazine empty");
            self.refuse_fire(player, Some(weapon));
            return;
        }

        // Homing shots hunt the opponent if it is still alive.
        let opponent = player.opponent();
        let target = self
            .world
            .query::<(&Body, &Craft)>()
            .iter()
            .any(|(_, (body, craft))| craft.player == opponent && !body.destroyed)
            .then_some(opponent);

        world_setup::insert_projectile(
            &mut self.world,
            &mut self.serials,
            body,
            Projectile::new(player, weapon, target),
        );
        debug!("{player} fired {weapon:?} from {:?}", launch.position);
        self.events.push(SimEvent::Fired {
            player,
            weapon,
            position: launch.position,
        });
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        let include_craft = !self.config.anchored_craft;

        // 1. Gravity
        systems::gravity::run(
            &mut self.world,
            self.config.gravity_constant,
            dt,
            include_craft,
        );
        // 2. Projectile bookkeeping + homing thrust
        systems::guidance::run(
            &mut self.world,
            &self.config.homing,
            self.config.gravity_constant,
            dt,
        );
        // 3. Movement integration
        systems::movement::run(&mut self.world, dt, include_craft);
        // 4. Arena bounds
        systems::bounds::run(
            &mut self.world,
            self.config.arena_width,
            self.config.arena_height,
            &mut self.events,
        );
        // 5. Collisions
        systems::collision::run(&mut self.world, &mut self.events);
        // 6. Round outcome
        self.check_round_over();
        // 7. Cleanup (destroyed bodies)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    /// End the round once any craft is destroyed; the survivor wins, a
    /// double kill is a draw.
    fn check_round_over(&mut self) {
        let mut any_destroyed = false;
        let mut survivors = Vec::new();
        for (_entity, (body, craft)) in self.world.query_mut::<(&Body, &Craft)>() {
            if body.destroyed {
                any_destroyed = true;
            } else {
                survivors.push(craft.player);
            }
        }
        if !any_destroyed {
            return;
        }

        let winner = match survivors.as_slice() {
            [survivor] => Some(*survivor),
            _ => None,
        };
        self.phase = RoundPhase::Over { winner };
        self.events.push(SimEvent::RoundOver { winner });
        match winner {
            Some(p) => info!("round over at {:.0}ms: {p} wins", self.time.elapsed_ms),
            None => info!("round over at {:.0}ms: draw", self.time.elapsed_ms),
        }
    }
}
