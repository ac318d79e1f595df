//! The offense × defense outcome table.
//!
//! One row per offense, one entry per defense. Every pairing players can
//! choose is present; [`lookup`] still returns `None` for anything missing
//! so the resolver can fall back to the default outcome.

use super::outcome::AudioCue;
use crate::game::{Defense, Offense, Status};

use AudioCue::{AnvilDrop, ExplosionSizzle, PianoLaunch};
use Defense::*;
use Status::{Burned, Captured, Compromised, Exposed};

/// Static base data for one (offense, defense) pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub defense: Defense,
    pub succeeds: bool,
    pub attacker_delta: i32,
    pub defender_delta: i32,
    pub attacker_status: Option<Status>,
    pub defender_status: Option<Status>,
    pub attacker_intel: &'static [&'static str],
    pub defender_intel: &'static [&'static str],
    pub audio: Option<AudioCue>,
    pub description: &'static str,
}

const fn entry(defense: Defense, succeeds: bool, atk: i32, def: i32, description: &'static str) -> Entry {
    Entry {
        defense,
        succeeds,
        attacker_delta: atk,
        defender_delta: def,
        attacker_status: None,
        defender_status: None,
        attacker_intel: &[],
        defender_intel: &[],
        audio: None,
        description,
    }
}

/// The offense lands.
const fn hit(defense: Defense, atk: i32, def: i32, description: &'static str) -> Entry {
    entry(defense, true, atk, def, description)
}

/// The defense holds.
const fn held(defense: Defense, atk: i32, def: i32, description: &'static str) -> Entry {
    entry(defense, false, atk, def, description)
}

impl Entry {
    const fn attacker(mut self, status: Status) -> Self {
        self.attacker_status = Some(status);
        self
    }

    const fn defender(mut self, status: Status) -> Self {
        self.defender_status = Some(status);
        self
    }

    const fn attacker_learns(mut self, intel: &'static [&'static str]) -> Self {
        self.attacker_intel = intel;
        self
    }

    const fn defender_learns(mut self, intel: &'static [&'static str]) -> Self {
        self.defender_intel = intel;
        self
    }

    const fn cue(mut self, audio: AudioCue) -> Self {
        self.audio = Some(audio);
        self
    }
}

/// Looks up the base entry for a pairing.
pub fn lookup(offense: Offense, defense: Defense) -> Option<&'static Entry> {
    row(offense).iter().find(|e| e.defense == defense)
}

/// All entries for one offense.
pub fn row(offense: Offense) -> &'static [Entry] {
    match offense {
        Offense::Assassination => ASSASSINATION,
        Offense::Sabotage => SABOTAGE,
        Offense::Exposure => EXPOSURE,
        Offense::Surveillance => SURVEILLANCE,
        Offense::Infiltration => INFILTRATION,
        Offense::AssetTheft => ASSET_THEFT,
        Offense::Misinformation => MISINFORMATION,
        Offense::NetworkAttack => NETWORK_ATTACK,
        Offense::ResourceDenial => RESOURCE_DENIAL,
        Offense::AllianceDisruption => ALLIANCE_DISRUPTION,
        Offense::FalseFlag => FALSE_FLAG,
    }
}

const ASSASSINATION: &[Entry] = &[
    held(SafeHouse, -1, 1, "Anvil trap springs! Assassin bonked on head, identity revealed.")
        .attacker(Exposed)
        .defender_learns(&["attacker_codename"])
        .cue(AnvilDrop),
    held(BodyguardDetail, -2, 2, "Bodyguards launch piano at assassin! Attack thwarted.")
        .defender_learns(&["attacker_next_offense"])
        .cue(PianoLaunch),
    held(MobileOperations, 0, 1, "Target was mobile - assassination attempt missed!"),
    hit(Underground, 2, -1, "Underground hideout bombed! Target compromised.")
        .defender(Compromised)
        .attacker_learns(&["defender_gadgets"])
        .cue(ExplosionSizzle),
    held(SweepClear, -1, 1, "Sweep detected the assassin! Identity exposed.")
        .attacker(Exposed)
        .defender_learns(&["attacker_location"])
        .cue(AnvilDrop),
    hit(FalseIdentity, 1, 0, "Wrong target! But still caused damage to operations.")
        .defender(Compromised)
        .cue(PianoLaunch),
    held(CounterSurveillance, -1, 2, "Counter-surveillance caught the assassin red-handed!")
        .attacker(Exposed)
        .defender_learns(&["attacker_allies"])
        .cue(ExplosionSizzle),
    hit(Disinformation, 1, -1, "Disinformation led assassin to target, but gave away defender plans.")
        .defender(Compromised)
        .attacker_learns(&["defender_next_defense"])
        .cue(PianoLaunch),
    held(PreemptiveStrike, -2, 3, "Preemptive strike neutralized the assassin first!")
        .attacker(Compromised)
        .defender_learns(&["attacker_master_plan_hint"])
        .cue(ExplosionSizzle),
    hit(AllianceBuilding, 2, -1, "Alliance meeting disrupted by assassination!")
        .defender(Compromised)
        .attacker_learns(&["defender_allies"])
        .cue(AnvilDrop),
    held(HoneypotOperations, -3, 2, "Honeypot trap! Assassin walked into elaborate setup and got burned!")
        .attacker(Burned)
        .defender_learns(&["attacker_full_dossier"])
        .cue(ExplosionSizzle),
    hit(InformationWarfare, 1, 0, "Biplane banner distracted security - assassination succeeded!")
        .defender(Compromised)
        .cue(PianoLaunch),
];

const SURVEILLANCE: &[Entry] = &[
    held(SafeHouse, 0, 1, "Safe house too secure for surveillance."),
    held(BodyguardDetail, -1, 1, "Bodyguards spotted the surveillance team!")
        .defender_learns(&["attacker_codename"])
        .cue(AnvilDrop),
    held(MobileOperations, 0, 1, "Target kept moving - surveillance lost the trail."),
    hit(Underground, 2, 0, "Underground hideout surveilled successfully!")
        .attacker_learns(&["defender_location", "defender_next_defense"]),
    held(SweepClear, -1, 2, "Sweep and clear found the surveillance equipment!")
        .attacker(Exposed)
        .defender_learns(&["attacker_equipment"])
        .cue(AnvilDrop),
    hit(FalseIdentity, 1, 0, "Surveillance successful, but gathered false information!")
        .attacker_learns(&["defender_fake_intel"]),
    held(CounterSurveillance, -2, 3, "Counter-surveillance turned the tables completely!")
        .attacker(Exposed)
        .defender_learns(&["attacker_full_equipment"])
        .cue(ExplosionSizzle),
    hit(Disinformation, 1, 0, "Surveillance gathered disinformation successfully.")
        .attacker_learns(&["defender_false_plans"]),
    held(PreemptiveStrike, -1, 1, "Preemptive strike disrupted surveillance operation!")
        .attacker(Compromised)
        .defender_learns(&["attacker_surveillance_target"])
        .cue(PianoLaunch),
    hit(AllianceBuilding, 2, -1, "Alliance meeting successfully surveilled!")
        .attacker_learns(&["defender_allies", "defender_alliance_plans"]),
    held(HoneypotOperations, -2, 2, "Surveillance team fell for the honeypot!")
        .attacker(Burned)
        .defender_learns(&["attacker_surveillance_methods"])
        .cue(ExplosionSizzle),
    hit(InformationWarfare, 1, 0, "Biplane banner provided cover for surveillance!")
        .attacker_learns(&["defender_next_defense"]),
];

const SABOTAGE: &[Entry] = &[
    held(SafeHouse, 0, 1, "Safe house kept the operation locked down."),
    hit(BodyguardDetail, 2, -1, "Bodyguards watch the principal, not the equipment. Operation sabotaged!")
        .attacker_learns(&["defender_gadgets"])
        .cue(ExplosionSizzle),
    hit(MobileOperations, 1, -1, "Sabotage caught the convoy mid-move.")
        .defender(Compromised)
        .cue(PianoLaunch),
    hit(Underground, 2, -2, "Underground bunker caved in! Target burned.")
        .defender(Burned)
        .cue(ExplosionSizzle),
    held(SweepClear, -1, 2, "Sweep found the charges before they went off!")
        .attacker(Exposed)
        .defender_learns(&["attacker_codename"])
        .cue(AnvilDrop),
    hit(FalseIdentity, 1, 0, "Sabotaged a decoy operation. Minor damage."),
    held(CounterSurveillance, -1, 1, "Saboteur caught on camera planting charges.")
        .defender_learns(&["attacker_equipment"]),
    hit(Disinformation, 1, -1, "Sabotage landed, but the blueprints were fake.")
        .attacker_learns(&["defender_false_plans"]),
    held(PreemptiveStrike, -2, 2, "Preemptive strike blew up the saboteur's van!")
        .attacker(Compromised)
        .cue(ExplosionSizzle),
    hit(AllianceBuilding, 2, -1, "Alliance summit sabotaged!")
        .defender(Compromised)
        .attacker_learns(&["defender_allies"])
        .cue(PianoLaunch),
    held(HoneypotOperations, -3, 2, "The sabotage target was a honeypot. Saboteur burned!")
        .attacker(Burned)
        .defender_learns(&["attacker_full_dossier"])
        .cue(ExplosionSizzle),
    hit(InformationWarfare, 1, 0, "Every eye was on the banner. Sabotage went unnoticed.")
        .defender(Compromised)
        .cue(PianoLaunch),
];

const EXPOSURE: &[Entry] = &[
    held(SafeHouse, 0, 1, "Nothing to expose behind closed doors."),
    hit(BodyguardDetail, 2, -1, "Bodyguards drew attention to their principal. Agent exposed!")
        .defender(Exposed)
        .attacker_learns(&["defender_codename"])
        .cue(PianoLaunch),
    held(MobileOperations, 0, 1, "Target kept moving and the story never went to print."),
    held(Underground, -1, 1, "The underground network smelled the reporter coming.")
        .defender_learns(&["attacker_codename"]),
    held(SweepClear, -1, 2, "Sweep flipped the exposure back onto the attacker!")
        .attacker(Exposed)
        .defender_learns(&["attacker_location"])
        .cue(AnvilDrop),
    held(FalseIdentity, -1, 1, "Exposed the wrong person entirely.")
        .attacker_learns(&["defender_fake_intel"]),
    held(CounterSurveillance, -2, 2, "Counter-surveillance had the photographer photographed.")
        .attacker(Exposed)
        .defender_learns(&["attacker_codename", "attacker_equipment"])
        .cue(ExplosionSizzle),
    hit(Disinformation, 1, 0, "Exposure published, half of it fabricated.")
        .defender(Exposed)
        .attacker_learns(&["defender_false_plans"]),
    held(PreemptiveStrike, -1, 1, "Preemptive strike shredded the dossier first.")
        .attacker(Compromised)
        .cue(PianoLaunch),
    hit(AllianceBuilding, 2, -1, "Caught shaking hands with an ally. Agent exposed!")
        .defender(Exposed)
        .attacker_learns(&["defender_allies"])
        .cue(PianoLaunch),
    held(HoneypotOperations, -2, 2, "The juicy secret was bait. Exposer burned!")
        .attacker(Burned)
        .defender_learns(&["attacker_full_dossier"])
        .cue(ExplosionSizzle),
    hit(InformationWarfare, 2, -1, "The banner spelled out the target's own name. Exposed!")
        .defender(Exposed)
        .cue(AnvilDrop),
];

const INFILTRATION: &[Entry] = &[
    held(SafeHouse, -1, 1, "Safe house doors don't open for strangers.")
        .defender_learns(&["attacker_codename"])
        .cue(AnvilDrop),
    held(BodyguardDetail, -1, 1, "Bodyguards checked every badge."),
    hit(MobileOperations, 1, 0, "Slipped into the moving convoy as a driver.")
        .attacker_learns(&["defender_location"]),
    hit(Underground, 2, -1, "Infiltrated the underground cell from within!")
        .defender(Compromised)
        .attacker_learns(&["defender_location", "defender_gadgets"])
        .cue(ExplosionSizzle),
    held(SweepClear, -2, 2, "Sweep caught the mole. Infiltrator captured!")
        .attacker(Captured)
        .defender_learns(&["attacker_codename"])
        .cue(AnvilDrop),
    hit(FalseIdentity, 1, 0, "Infiltrated a cover identity. The intel may be stale.")
        .attacker_learns(&["defender_fake_intel"]),
    held(CounterSurveillance, -1, 2, "Counter-surveillance flagged the new recruit.")
        .attacker(Exposed)
        .defender_learns(&["attacker_allies"]),
    hit(Disinformation, 1, 0, "Infiltration succeeded, into a fog of disinformation.")
        .attacker_learns(&["defender_false_plans"]),
    held(PreemptiveStrike, -2, 1, "Preemptive purge caught the infiltrator mid-onboarding.")
        .attacker(Compromised)
        .cue(PianoLaunch),
    hit(AllianceBuilding, 2, -1, "Infiltrated the alliance delegation!")
        .attacker_learns(&["defender_allies", "defender_alliance_plans"]),
    held(HoneypotOperations, -3, 3, "The honeypot welcomed the infiltrator in and locked the door. Captured!")
        .attacker(Captured)
        .defender_learns(&["attacker_full_dossier"])
        .cue(ExplosionSizzle),
    hit(InformationWarfare, 1, 0, "Walked in under cover of the banner display.")
        .attacker_learns(&["defender_next_defense"]),
];

const ASSET_THEFT: &[Entry] = &[
    held(SafeHouse, 0, 1, "The vault in the safe house stayed shut."),
    held(BodyguardDetail, -2, 2, "Bodyguards tackled the thief!")
        .defender_learns(&["attacker_codename"])
        .cue(PianoLaunch),
    hit(MobileOperations, 2, -2, "Snatched the goods from the moving van!"),
    hit(Underground, 3, -2, "Looted the underground stash!").cue(ExplosionSizzle),
    held(SweepClear, -1, 1, "Sweep found the thief hiding in the vents.")
        .attacker(Exposed)
        .cue(AnvilDrop),
    hit(FalseIdentity, 1, -1, "Robbed a cover account."),
    held(CounterSurveillance, -2, 2, "The theft was recorded from three angles.")
        .attacker(Exposed)
        .defender_learns(&["attacker_location"]),
    hit(Disinformation, 1, 0, "Got away with the loot, mostly counterfeit.")
        .attacker_learns(&["defender_false_plans"]),
    held(PreemptiveStrike, -2, 3, "Preemptive strike on the getaway car!")
        .attacker(Compromised)
        .cue(ExplosionSizzle),
    hit(AllianceBuilding, 2, -2, "Emptied the alliance war chest!")
        .attacker_learns(&["defender_allies"]),
    held(HoneypotOperations, -3, 2, "The vault was booby-trapped. Thief burned!")
        .attacker(Burned)
        .defender_learns(&["attacker_full_dossier"])
        .cue(ExplosionSizzle),
    hit(InformationWarfare, 2, -1, "Everyone was reading the banner. Theft went unnoticed.")
        .cue(PianoLaunch),
];

const MISINFORMATION: &[Entry] = &[
    hit(SafeHouse, 1, -1, "Isolated in the safe house, the target swallowed the story."),
    hit(BodyguardDetail, 1, 0, "Bodyguards passed the rumor straight to the principal."),
    hit(MobileOperations, 1, -1, "A target on the move believed the fake rendezvous."),
    hit(Underground, 2, -1, "The underground rumor mill spread the lie for free."),
    held(SweepClear, 0, 1, "Sweep and clear filtered out the planted story."),
    held(FalseIdentity, 0, 1, "The lie reached a cover identity nobody reads."),
    held(CounterSurveillance, -1, 2, "Counter-surveillance traced the rumor to its source.")
        .defender_learns(&["attacker_codename"]),
    held(Disinformation, 0, 1, "Two liars at one table. Neither believed a word."),
    hit(PreemptiveStrike, 1, -1, "Misinformation baited a preemptive strike on friendly targets!")
        .defender(Compromised)
        .cue(PianoLaunch),
    hit(AllianceBuilding, 2, -2, "Planted doubt inside the alliance!")
        .defender(Compromised)
        .attacker_learns(&["defender_allies"])
        .cue(AnvilDrop),
    held(HoneypotOperations, -2, 2, "Tried to mislead a honeypot handler. Burned!")
        .attacker(Burned)
        .defender_learns(&["attacker_full_dossier"])
        .cue(ExplosionSizzle),
    held(InformationWarfare, -1, 1, "The banner drowned out the rumor."),
];

const NETWORK_ATTACK: &[Entry] = &[
    hit(SafeHouse, 1, 0, "Safe house routers were wide open. Network breached!")
        .cue(ExplosionSizzle),
    hit(BodyguardDetail, 2, 0, "Bodyguards can't stop packets. Network breached!"),
    held(MobileOperations, 0, 1, "Mobile cells kept rotating their keys."),
    held(Underground, -1, 1, "The air-gapped underground network shrugged off the attack."),
    held(SweepClear, -1, 2, "Sweep found the rogue access point.")
        .attacker(Exposed)
        .defender_learns(&["attacker_equipment"])
        .cue(AnvilDrop),
    hit(FalseIdentity, 1, 0, "Breached a shell network. It still counts.")
        .attacker_learns(&["defender_fake_intel"]),
    held(CounterSurveillance, -2, 2, "Counter-surveillance traced the intrusion back home.")
        .attacker(Exposed)
        .defender_learns(&["attacker_location"])
        .cue(ExplosionSizzle),
    hit(Disinformation, 1, -1, "Breached the network amid decoy traffic.")
        .attacker_learns(&["defender_false_plans"]),
    held(PreemptiveStrike, -2, 2, "Preemptive strike cut the attacker's uplink.")
        .attacker(Compromised)
        .cue(PianoLaunch),
    hit(AllianceBuilding, 2, -1, "Alliance comms network compromised!")
        .attacker_learns(&["defender_alliance_plans"]),
    held(HoneypotOperations, -3, 3, "Attacked a honeypot server. Burned!")
        .attacker(Burned)
        .defender_learns(&["attacker_full_dossier"])
        .cue(ExplosionSizzle),
    hit(InformationWarfare, 2, 0, "The banner broadcast jammed the firewall console. Network breached!")
        .cue(PianoLaunch),
];

const RESOURCE_DENIAL: &[Entry] = &[
    hit(SafeHouse, 1, -2, "Supply lines to the safe house cut."),
    hit(BodyguardDetail, 1, -2, "Bodyguard payroll frozen!"),
    held(MobileOperations, 0, 1, "Mobile operations live off the land."),
    hit(Underground, 2, -2, "Underground supplies seized!")
        .defender(Compromised)
        .cue(ExplosionSizzle),
    held(SweepClear, -1, 1, "Sweep caught the blockade crew.")
        .attacker(Exposed)
        .cue(AnvilDrop),
    held(FalseIdentity, 0, 1, "Froze the accounts of a fictional person."),
    held(CounterSurveillance, -1, 2, "Counter-surveillance saw the embargo coming.")
        .defender_learns(&["attacker_codename"]),
    hit(Disinformation, 1, -1, "Resources denied, though the ledger was doctored."),
    held(PreemptiveStrike, -2, 2, "Preemptive strike hit the blockade first.")
        .attacker(Compromised)
        .cue(PianoLaunch),
    hit(AllianceBuilding, 2, -3, "Cut off the alliance supply chain!")
        .attacker_learns(&["defender_allies"]),
    held(HoneypotOperations, -2, 2, "The supply depot was a trap. Burned!")
        .attacker(Burned)
        .defender_learns(&["attacker_full_dossier"])
        .cue(ExplosionSizzle),
    hit(InformationWarfare, 1, -2, "While the banner flew, the funding vanished.")
        .cue(PianoLaunch),
];

const ALLIANCE_DISRUPTION: &[Entry] = &[
    held(SafeHouse, 0, 1, "No allies to turn behind safe house walls."),
    hit(BodyguardDetail, 1, -1, "Bodyguards are loyal to the highest bidder. Alliance rattled!")
        .attacker_learns(&["defender_allies"]),
    held(MobileOperations, 0, 1, "Too mobile to pin an alliance on."),
    hit(Underground, 1, -1, "Underground contacts turned on each other.")
        .attacker_learns(&["defender_allies"]),
    held(SweepClear, -1, 1, "Sweep exposed the agitator.")
        .attacker(Exposed)
        .cue(AnvilDrop),
    held(FalseIdentity, 0, 1, "Disrupted an alliance that never existed."),
    held(CounterSurveillance, -1, 2, "Counter-surveillance caught the wedge being driven.")
        .defender_learns(&["attacker_codename"]),
    hit(Disinformation, 2, -1, "Fed each ally the other's disinformation!"),
    held(PreemptiveStrike, -2, 2, "Preemptive strike silenced the agitator.")
        .attacker(Compromised)
        .cue(PianoLaunch),
    hit(AllianceBuilding, 3, -2, "The alliance summit collapsed into shouting!")
        .defender(Compromised)
        .attacker_learns(&["defender_alliance_plans"])
        .cue(ExplosionSizzle),
    held(HoneypotOperations, -2, 2, "The disgruntled ally was a plant. Burned!")
        .attacker(Burned)
        .defender_learns(&["attacker_full_dossier"])
        .cue(ExplosionSizzle),
    hit(InformationWarfare, 1, -1, "The banner read YOUR ALLY LIES. It worked.")
        .cue(PianoLaunch),
];

const FALSE_FLAG: &[Entry] = &[
    held(SafeHouse, 0, 1, "Nobody believed the safe house was involved."),
    hit(BodyguardDetail, 1, -1, "Planted evidence on the bodyguards!")
        .defender(Compromised),
    hit(MobileOperations, 1, -1, "Framed the convoy for a hit it never made.")
        .defender(Compromised),
    hit(Underground, 2, -1, "Framed the underground cell. Target burned!")
        .defender(Burned)
        .cue(ExplosionSizzle),
    held(SweepClear, -1, 2, "Sweep found the forged evidence.")
        .attacker(Exposed)
        .defender_learns(&["attacker_codename"])
        .cue(AnvilDrop),
    held(FalseIdentity, 0, 1, "Framed a cover identity. The real agent walked."),
    held(CounterSurveillance, -2, 2, "Counter-surveillance has footage of the frame-up.")
        .attacker(Exposed)
        .defender_learns(&["attacker_codename", "attacker_location"])
        .cue(ExplosionSizzle),
    hit(Disinformation, 1, 0, "The frame blended right in with the disinformation.")
        .defender(Compromised),
    held(PreemptiveStrike, -1, 1, "Preemptive strike caught the forger.")
        .attacker(Compromised)
        .cue(PianoLaunch),
    hit(AllianceBuilding, 2, -2, "False flag turned the allies against the target!")
        .defender(Compromised)
        .attacker_learns(&["defender_allies"])
        .cue(PianoLaunch),
    held(HoneypotOperations, -3, 2, "Framed a honeypot handler. The forger was captured!")
        .attacker(Captured)
        .defender_learns(&["attacker_full_dossier"])
        .cue(ExplosionSizzle),
    hit(InformationWarfare, 1, 0, "The banner carried the forged confession.")
        .defender(Compromised)
        .cue(PianoLaunch),
];
