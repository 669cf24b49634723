use combat_core::{
    Ability, BossDefinition, BossPhaseDefinition, CombatConfig, CombatError, CombatSession,
    DeathShield, DoubleStrike, Executioner, Lifesteal, Modifier, Notification, Passive, Stats,
    StatusEffect, StatusKind, StatusOnHit, Unit, UnitId,
};

fn session() -> CombatSession {
    CombatSession::new(CombatConfig::with_seed(42))
}

fn spawn(session: &mut CombatSession, name: &str, max_hp: i32, armor: i32) -> UnitId {
    session
        .spawn(Unit::new(name, Stats::new(max_hp, 10, armor, 10)))
        .unwrap()
}

#[test]
fn flat_then_percentage_rounds_up_to_23() {
    let mut session = session();
    let attacker = spawn(&mut session, "attacker", 100, 0);
    let target = spawn(&mut session, "target", 100, 0);

    session.register_modifier(Modifier::percentage(150).for_unit(attacker));
    session.register_modifier(Modifier::flat(5).for_unit(attacker));

    let attack_power = session.unit(attacker).unwrap().stats().attack_power;
    let damage = session.resolve_attack(attacker, target, attack_power).unwrap();

    assert_eq!(damage, 23);
    assert_eq!(session.unit(target).unwrap().hp(), 77);
}

#[test]
fn unit_scoped_modifiers_ignore_other_sources() {
    let mut session = session();
    let attacker = spawn(&mut session, "attacker", 100, 0);
    let other = spawn(&mut session, "other", 100, 0);

    session.register_modifier(Modifier::flat(5).for_unit(attacker));

    assert_eq!(session.resolve_attack(other, attacker, 10).unwrap(), 10);
}

#[test]
fn double_strike_at_full_chance_adds_exactly_one_attack() {
    let mut session = session();
    let attacker = spawn(&mut session, "attacker", 100, 0);
    let target = spawn(&mut session, "target", 1_000, 0);
    session
        .attach_passive(attacker, Passive::DoubleStrike(DoubleStrike::new(100)))
        .unwrap();

    let damage = session.resolve_attack(attacker, target, 10).unwrap();

    assert_eq!(damage, 10);
    let follow_ups: Vec<_> = session
        .notifications()
        .iter()
        .filter_map(|n| match n {
            Notification::AttackResolved { follow_up, .. } => Some(*follow_up),
            _ => None,
        })
        .collect();
    assert_eq!(follow_ups, vec![false, true]);
    assert_eq!(session.unit(target).unwrap().hp(), 980);
}

#[test]
fn death_shield_revives_once() {
    let mut session = session();
    let attacker = spawn(&mut session, "attacker", 100, 0);
    let target = spawn(&mut session, "target", 100, 0);
    let shield = session
        .attach_passive(target, Passive::DeathShield(DeathShield::new(30)))
        .unwrap();

    session.resolve_attack(attacker, target, 150).unwrap();
    let unit = session.unit(target).unwrap();
    assert!(unit.is_alive());
    assert_eq!(unit.hp(), 30);
    match unit.passive(shield) {
        Some(Passive::DeathShield(shield)) => assert!(shield.is_triggered()),
        other => panic!("unexpected passive {other:?}"),
    }

    session.resolve_attack(attacker, target, 150).unwrap();
    let unit = session.unit(target).unwrap();
    assert!(unit.is_dead());
    assert_eq!(unit.hp(), 0);

    let prevented = session
        .notifications()
        .iter()
        .filter(|n| matches!(n, Notification::DeathPrevented { .. }))
        .count();
    let died = session
        .notifications()
        .iter()
        .filter(|n| matches!(n, Notification::UnitDied { .. }))
        .count();
    assert_eq!((prevented, died), (1, 1));
}

#[test]
fn dead_target_returns_zero() {
    let mut session = session();
    let attacker = spawn(&mut session, "attacker", 100, 0);
    let target = spawn(&mut session, "target", 10, 0);

    session.resolve_attack(attacker, target, 50).unwrap();
    assert!(session.unit(target).unwrap().is_dead());

    assert_eq!(session.resolve_attack(attacker, target, 50).unwrap(), 0);
}

#[test]
fn heal_does_nothing_on_dead_unit() {
    let mut session = session();
    let attacker = spawn(&mut session, "attacker", 100, 0);
    let target = spawn(&mut session, "target", 10, 0);
    session.resolve_attack(attacker, target, 50).unwrap();

    assert_eq!(session.heal(target, 5).unwrap(), 0);
    assert_eq!(session.unit(target).unwrap().hp(), 0);
    assert!(session.unit(target).unwrap().is_dead());
    assert_eq!(session.heal(attacker, 5).unwrap(), 0);
}

#[test]
fn revive_restores_a_dead_unit() {
    let mut session = session();
    let attacker = spawn(&mut session, "attacker", 100, 0);
    let target = spawn(&mut session, "target", 10, 0);
    session.resolve_attack(attacker, target, 50).unwrap();

    assert!(session.revive(target, 500).unwrap());
    assert_eq!(session.unit(target).unwrap().hp(), 10);
    assert!(!session.revive(target, 5).unwrap());
}

#[test]
fn unknown_units_are_contract_violations() {
    let mut session = session();
    let attacker = spawn(&mut session, "attacker", 100, 0);

    assert_eq!(
        session.resolve_attack(attacker, UnitId(9), 10),
        Err(CombatError::UnknownUnit(UnitId(9)))
    );
}

#[test]
fn lifesteal_heals_floor_share_of_damage() {
    let mut session = session();
    let attacker = spawn(&mut session, "attacker", 100, 0);
    let target = spawn(&mut session, "target", 100, 0);
    session
        .attach_passive(attacker, Passive::Lifesteal(Lifesteal::new(20)))
        .unwrap();
    session.resolve_attack(target, attacker, 50).unwrap();

    session.resolve_attack(attacker, target, 19).unwrap();

    // 20% of 19 floors to 3.
    assert_eq!(session.unit(attacker).unwrap().hp(), 53);
}

#[test]
fn burn_refresh_keeps_higher_damage() {
    let mut session = session();
    let target = spawn(&mut session, "target", 100, 0);

    session.apply_status(target, StatusEffect::burn(5, 3)).unwrap();
    assert_eq!(session.tick_turn_start(target).unwrap(), 5);
    session.apply_status(target, StatusEffect::burn(3, 3)).unwrap();

    let burn = session.status(target, StatusKind::Burn).unwrap().unwrap();
    assert_eq!(burn.base_damage, 5);
    assert_eq!(burn.duration, 3);
    assert_eq!(session.unit(target).unwrap().statuses().len(), 1);
}

#[test]
fn poison_on_hit_stacks_across_hits() {
    let mut session = session();
    let attacker = spawn(&mut session, "attacker", 100, 0);
    let target = spawn(&mut session, "target", 100, 0);
    session
        .attach_passive(
            attacker,
            Passive::StatusOnHit(StatusOnHit::new(StatusEffect::poison(2, 3), 100)),
        )
        .unwrap();

    session.resolve_attack(attacker, target, 10).unwrap();
    session.resolve_attack(attacker, target, 10).unwrap();

    let poison = session.status(target, StatusKind::Poison).unwrap().unwrap();
    assert_eq!(poison.stacks, 4);
}

#[test]
fn removed_status_stops_ticking() {
    let mut session = session();
    let target = spawn(&mut session, "target", 100, 0);
    session.apply_status(target, StatusEffect::burn(8, 3)).unwrap();

    let removed = session.remove_status(target, StatusKind::Burn).unwrap();
    assert_eq!(removed.map(|effect| effect.base_damage), Some(8));
    assert_eq!(session.remove_status(target, StatusKind::Burn).unwrap(), None);

    assert_eq!(session.tick_turn_start(target).unwrap(), 0);
    assert_eq!(session.unit(target).unwrap().hp(), 100);
}

#[test]
fn status_ticks_bypass_armor_and_expire() {
    let mut session = session();
    let target = spawn(&mut session, "target", 100, 1_000);

    session.apply_status(target, StatusEffect::poison(3, 2)).unwrap();
    assert_eq!(session.tick_turn_start(target).unwrap(), 3);
    assert_eq!(session.tick_turn_start(target).unwrap(), 3);
    assert_eq!(session.tick_turn_start(target).unwrap(), 0);

    assert_eq!(session.unit(target).unwrap().hp(), 94);
    assert!(session.status(target, StatusKind::Poison).unwrap().is_none());
    assert!(session.notifications().contains(&Notification::StatusExpired {
        unit: target,
        kind: StatusKind::Poison,
    }));
}

#[test]
fn lethal_status_tick_runs_death_shield() {
    let mut session = session();
    let target = spawn(&mut session, "target", 10, 0);
    session
        .attach_passive(target, Passive::DeathShield(DeathShield::new(50)))
        .unwrap();

    session.apply_status(target, StatusEffect::burn(20, 1)).unwrap();
    session.tick_turn_start(target).unwrap();

    assert!(session.unit(target).unwrap().is_alive());
    assert_eq!(session.unit(target).unwrap().hp(), 5);
}

#[test]
fn detach_releases_every_registration() {
    let mut session = session();
    let unit = spawn(&mut session, "unit", 100, 0);

    let ids = session
        .attach_passives(
            unit,
            vec![
                Passive::Executioner(Executioner::new(30, 150)),
                Passive::DeathShield(DeathShield::new(30)),
            ],
        )
        .unwrap();
    assert_eq!(session.modifiers().len(), 1);
    assert_eq!(session.events().len(), 1);

    // Lower priority attaches first.
    let attached: Vec<_> = session
        .unit(unit)
        .unwrap()
        .passives()
        .iter()
        .map(|p| p.passive().name())
        .collect();
    assert_eq!(attached, vec!["death_shield", "executioner"]);

    for id in ids {
        session.detach_passive(unit, id).unwrap();
        assert_eq!(session.events().subscription_count(id), 0);
    }
    assert!(session.modifiers().is_empty());
    assert!(session.events().is_empty());
    assert!(session.unit(unit).unwrap().passives().is_empty());
}

#[test]
fn detaching_twice_is_rejected() {
    let mut session = session();
    let unit = spawn(&mut session, "unit", 100, 0);
    let id = session
        .attach_passive(unit, Passive::Lifesteal(Lifesteal::new(10)))
        .unwrap();

    session.detach_passive(unit, id).unwrap();
    assert_eq!(
        session.detach_passive(unit, id).unwrap_err(),
        CombatError::PassiveNotAttached { unit, passive: id }
    );
}

#[test]
fn boss_advances_one_phase_per_health_change() {
    let mut session = session();
    let hero = spawn(&mut session, "hero", 100, 0);
    let boss = spawn(&mut session, "boss", 100, 0);
    session
        .initialize_boss(
            boss,
            BossDefinition::new(
                "warden",
                vec![
                    BossPhaseDefinition::new(100, 2),
                    BossPhaseDefinition::new(60, 2),
                    BossPhaseDefinition::new(30, 1),
                ],
            ),
        )
        .unwrap();
    assert_eq!(session.boss_phase(boss), Some(0));

    let mut phases = Vec::new();
    for hit in [30, 15, 15, 20] {
        session.resolve_attack(hero, boss, hit).unwrap();
        phases.push(session.boss_phase(boss).unwrap());
    }
    assert_eq!(phases, vec![0, 1, 1, 2]);
}

#[test]
fn boss_crossing_two_thresholds_waits_for_next_change() {
    let mut session = session();
    let hero = spawn(&mut session, "hero", 100, 0);
    let boss = spawn(&mut session, "boss", 100, 0);
    session
        .initialize_boss(
            boss,
            BossDefinition::new(
                "warden",
                vec![
                    BossPhaseDefinition::new(100, 2),
                    BossPhaseDefinition::new(60, 2),
                    BossPhaseDefinition::new(30, 1),
                ],
            ),
        )
        .unwrap();

    session.resolve_attack(hero, boss, 80).unwrap();
    assert_eq!(session.boss_phase(boss), Some(1));

    session.resolve_attack(hero, boss, 1).unwrap();
    assert_eq!(session.boss_phase(boss), Some(2));
}

#[test]
fn phase_abilities_accumulate() {
    let mut session = session();
    let hero = spawn(&mut session, "hero", 1_000, 0);
    let boss = spawn(&mut session, "boss", 100, 0);
    session
        .initialize_boss(
            boss,
            BossDefinition::new(
                "warden",
                vec![
                    BossPhaseDefinition::new(100, 2).with_ability(Ability::Empower { amount: 5 }),
                    BossPhaseDefinition::new(50, 1)
                        .with_ability(Ability::Enrage { percent: 200 })
                        .with_ability(Ability::Fortify { armor: 100 }),
                ],
            ),
        )
        .unwrap();

    assert_eq!(session.resolve_attack(boss, hero, 10).unwrap(), 15);

    session.resolve_attack(hero, boss, 60).unwrap();
    assert_eq!(session.boss_phase(boss), Some(1));
    assert_eq!(session.resolve_attack(boss, hero, 10).unwrap(), 30);
    assert_eq!(session.unit(boss).unwrap().stats().armor, 100);
    assert_eq!(session.unit(boss).unwrap().abilities().len(), 3);

    // Armor 100 halves incoming damage before modifiers.
    assert_eq!(session.resolve_attack(hero, boss, 20).unwrap(), 10);
}

#[test]
fn phase_entry_cleanses_and_grants_a_death_shield() {
    let mut session = session();
    let hero = spawn(&mut session, "hero", 100, 0);
    let boss = spawn(&mut session, "boss", 100, 0);
    session
        .initialize_boss(
            boss,
            BossDefinition::new(
                "lich",
                vec![
                    BossPhaseDefinition::new(100, 2),
                    BossPhaseDefinition::new(50, 1)
                        .with_ability(Ability::Cleanse)
                        .with_ability(Ability::GrantPassive(Passive::DeathShield(
                            DeathShield::new(30),
                        ))),
                ],
            ),
        )
        .unwrap();
    session.apply_status(boss, StatusEffect::poison(3, 5)).unwrap();

    session.resolve_attack(hero, boss, 60).unwrap();
    assert_eq!(session.boss_phase(boss), Some(1));
    assert!(session.unit(boss).unwrap().statuses().is_empty());
    assert_eq!(session.unit(boss).unwrap().passives().len(), 1);

    session.resolve_attack(hero, boss, 100).unwrap();
    assert!(session.unit(boss).unwrap().is_alive());
    assert_eq!(session.unit(boss).unwrap().hp(), 30);
}

#[test]
fn boss_cannot_be_initialized_twice() {
    let mut session = session();
    let boss = spawn(&mut session, "boss", 100, 0);
    let definition = BossDefinition::new("warden", vec![BossPhaseDefinition::new(100, 1)]);

    session.initialize_boss(boss, definition.clone()).unwrap();
    assert_eq!(
        session.initialize_boss(boss, definition),
        Err(CombatError::BossAlreadyInitialized(boss))
    );
}

#[test]
fn notifications_can_be_disabled() {
    let config = CombatConfig {
        record_notifications: false,
        ..CombatConfig::default()
    };
    let mut session = CombatSession::new(config);
    let attacker = spawn(&mut session, "attacker", 100, 0);
    let target = spawn(&mut session, "target", 100, 0);

    session.resolve_attack(attacker, target, 10).unwrap();

    assert!(session.drain_notifications().is_empty());
}
