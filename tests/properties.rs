//! Property tests for the resolution arithmetic

use autobattle::battle::{
    apply_inventory_damage, space_outcome, AttackDefense, BattleHooks, DamageScope, DamageTarget,
    SpaceOutcome,
};
use autobattle::core::types::{FleetId, PlayerId};
use autobattle::rules::{ItemCategory, ItemType, RulesCatalog};
use autobattle::world::{Fleet, Holder, World};
use proptest::prelude::*;

fn rank(outcome: SpaceOutcome) -> u8 {
    match outcome {
        SpaceOutcome::DefenderVictory => 0,
        SpaceOutcome::Stalemate | SpaceOutcome::Draw => 1,
        SpaceOutcome::AttackerVictory => 2,
    }
}

proptest! {
    #[test]
    fn more_attack_never_slows_the_kill(
        attack in 0.1f64..1000.0,
        extra in 0.01f64..1000.0,
        own_defense in 0.0f64..10_000.0,
        enemy_attack in 0.0f64..1000.0,
        enemy_defense in 0.0f64..10_000.0,
    ) {
        let enemy = AttackDefense { attack: enemy_attack, defense: enemy_defense, ..Default::default() };
        let weak = AttackDefense { attack, defense: own_defense, ..Default::default() };
        let strong = AttackDefense { attack: attack + extra, ..weak };

        let slow = weak.time_to_kill(&enemy);
        let fast = strong.time_to_kill(&enemy);
        prop_assert!(fast < slow);

        let enemy_time = enemy.time_to_kill(&weak);
        prop_assert!(rank(space_outcome(fast, enemy_time)) >= rank(space_outcome(slow, enemy_time)));
    }

    #[test]
    fn damage_never_creates_units(
        stacks in prop::collection::vec((1u32..20, 1.0f64..100.0, 1.0f64..100.0), 1..5),
        pool in 0.0f64..5000.0,
    ) {
        let mut rules = RulesCatalog::new();
        let mut world = World::new();
        world.add_fleet(Fleet::new(FleetId(1), PlayerId(1), "Target"));
        let holder = Holder::Fleet(FleetId(1));

        for (index, (count, hp, cost)) in stacks.iter().enumerate() {
            let item_type = ItemType {
                id: format!("T{}", index),
                category: ItemCategory::Cruiser,
                production_cost: *cost,
                hitpoints: *hp,
                shield: 0.0,
                slots: vec![],
                vehicle: None,
            };
            world.spawn_item(holder, &item_type, *count).unwrap();
            rules.add_item(item_type);
        }
        let initial: u32 = stacks.iter().map(|s| s.0).sum();
        let mut hooks = BattleHooks::new();

        let report = apply_inventory_damage(
            &mut world,
            &rules,
            &mut hooks,
            DamageTarget::single(&holder, DamageScope::All),
            pool,
            Some(PlayerId(2)),
        );

        prop_assert!(report.absorbed <= pool + 1e-9);
        let remaining: u32 = match world.inventory(holder) {
            Some(inventory) => {
                for item in inventory {
                    let index: usize = item.type_id[1..].parse().unwrap();
                    let (count, hp, _) = stacks[index];
                    prop_assert!(item.count <= count);
                    prop_assert!(item.hp >= 0.0 && item.hp <= hp);
                }
                inventory.iter().map(|i| i.count).sum()
            }
            None => 0,
        };
        prop_assert_eq!(remaining + report.units_lost, initial);
        let destroyed = world.stats(PlayerId(2)).map(|s| s.ships_destroyed).unwrap_or(0);
        prop_assert_eq!(destroyed, report.units_lost);
    }
}
