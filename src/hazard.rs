//! Static hazard templates, keyed by hazard type and severity.
//!
//! The table is a set of immutable statics; [`template`] is total over the
//! closed [`HazardType`] and [`Severity`] types, so every lookup succeeds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of disaster scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardType {
    Wildfire,
    Flood,
    Tsunami,
    Earthquake,
    Hurricane,
}

impl HazardType {
    pub const ALL: [HazardType; 5] = [
        HazardType::Wildfire,
        HazardType::Flood,
        HazardType::Tsunami,
        HazardType::Earthquake,
        HazardType::Hurricane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardType::Wildfire => "wildfire",
            HazardType::Flood => "flood",
            HazardType::Tsunami => "tsunami",
            HazardType::Earthquake => "earthquake",
            HazardType::Hurricane => "hurricane",
        }
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert status derived from severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Watch,
    Warning,
    Emergency,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Watch => "watch",
            Status::Warning => "warning",
            Status::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity level 3 (moderate) to 5 (extreme).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const MODERATE: Severity = Severity(3);
    pub const SEVERE: Severity = Severity(4);
    pub const EXTREME: Severity = Severity(5);

    pub const ALL: [Severity; 3] = [Severity::MODERATE, Severity::SEVERE, Severity::EXTREME];

    pub fn new(level: u8) -> Option<Severity> {
        (3..=5).contains(&level).then_some(Severity(level))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn status(&self) -> Status {
        match self.0 {
            5 => Status::Emergency,
            4 => Status::Warning,
            _ => Status::Watch,
        }
    }

    fn index(&self) -> usize {
        (self.0 - 3) as usize
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Narrative and official guidance for one (hazard, severity) pair.
#[derive(Debug)]
pub struct HazardTemplate {
    pub status: Status,
    pub description: &'static str,
    pub impact_time: &'static str,
    pub official_actions: [&'static str; 5],
}

/// Returns the template for a hazard at a given severity.
pub fn template(hazard: HazardType, severity: Severity) -> &'static HazardTemplate {
    let row = match hazard {
        HazardType::Wildfire => &WILDFIRE,
        HazardType::Flood => &FLOOD,
        HazardType::Tsunami => &TSUNAMI,
        HazardType::Earthquake => &EARTHQUAKE,
        HazardType::Hurricane => &HURRICANE,
    };
    &row[severity.index()]
}

static WILDFIRE: [HazardTemplate; 3] = [
    HazardTemplate {
        status: Status::Watch,
        description: "Brush fire burning in dry vegetation under moderate winds. Crews are working containment lines and smoke is drifting over nearby streets.",
        impact_time: "4-6 hours",
        official_actions: [
            "Keep a radio or phone tuned to local emergency alerts",
            "Pack a go-bag with water, medications, and important documents",
            "Shut windows and doors to keep smoke out",
            "Clear dry brush and firewood away from the house",
            "Plan two different ways out of your neighborhood",
        ],
    },
    HazardTemplate {
        status: Status::Warning,
        description: "Fast-moving wildfire driven by strong winds and low humidity. Homes are threatened and evacuation orders are expected within hours.",
        impact_time: "1-2 hours",
        official_actions: [
            "Leave right away if you are in the fire zone or are told to evacuate",
            "Shut off gas, propane, and pilot lights before you go",
            "Close windows and doors but leave them unlocked for firefighters",
            "Move patio furniture and other flammables away from walls",
            "Load family and pets and drive out with headlights on",
        ],
    },
    HazardTemplate {
        status: Status::Emergency,
        description: "Extreme fire behavior with wind-driven firestorms. Several neighborhoods are under mandatory evacuation and lives are at immediate risk.",
        impact_time: "30-60 minutes",
        official_actions: [
            "EVACUATE NOW and do not wait for another warning",
            "Take only what you can carry and leave immediately",
            "If cut off, move to a cleared area away from trees and brush",
            "Call 911 with your location if you cannot get out",
            "Breathe through a damp cloth and stay low under smoke",
        ],
    },
];

static FLOOD: [HazardTemplate; 3] = [
    HazardTemplate {
        status: Status::Watch,
        description: "Heavy rain is pushing creeks and rivers higher. Flash flooding is possible in low spots, underpasses, and along waterways.",
        impact_time: "3-5 hours",
        official_actions: [
            "Move electronics and valuables to an upper floor",
            "Watch weather updates and river level reports",
            "Do not drive into standing water of unknown depth",
            "Set sandbags at doorways if your area floods often",
            "Know the fastest route to higher ground",
        ],
    },
    HazardTemplate {
        status: Status::Warning,
        description: "Major flooding is under way with water rising quickly. Roads are closing and water is entering buildings in low-lying blocks.",
        impact_time: "1-2 hours",
        official_actions: [
            "Go to higher ground at once if an evacuation is ordered",
            "Never walk or drive through floodwater; six inches can knock you over",
            "Turn off power and gas at the main if water is approaching",
            "Move to the top floor if you cannot leave",
            "Stay off bridges above fast-moving water",
        ],
    },
    HazardTemplate {
        status: Status::Emergency,
        description: "Life-threatening flood. A levee or dam failure is imminent and flash flooding is sweeping away cars and buildings.",
        impact_time: "Immediate",
        official_actions: [
            "GET TO HIGH GROUND NOW; this is a life-threatening emergency",
            "If trapped inside, go to the highest floor but not a closed attic",
            "Signal for help and stay put if the water is too deep to cross",
            "Do not try to swim through moving water",
            "Call 911 with your exact location if you are stranded",
        ],
    },
];

static TSUNAMI: [HazardTemplate; 3] = [
    HazardTemplate {
        status: Status::Watch,
        description: "A distant earthquake has produced tsunami waves. Strong currents are possible at beaches and harbors, with no immediate danger inland.",
        impact_time: "2-4 hours",
        official_actions: [
            "Follow NOAA tsunami alerts and local officials",
            "Stay away from beaches, harbors, and land below 100 feet",
            "Review the tsunami evacuation route for your area",
            "Get evacuation supplies ready in case the watch is upgraded",
            "Do not go to the shore to watch the waves",
        ],
    },
    HazardTemplate {
        status: Status::Warning,
        description: "Tsunami waves are confirmed and approaching the coast. Dangerous surges and coastal flooding are expected for several hours.",
        impact_time: "30-90 minutes",
        official_actions: [
            "Move to ground at least 100 feet above sea level now",
            "Go at least 2 miles inland if there is no high ground nearby",
            "Leave immediately without gathering belongings",
            "Walk if roads are jammed rather than waiting in a car",
            "Stay away from the coast for hours; more waves will follow",
        ],
    },
    HazardTemplate {
        status: Status::Emergency,
        description: "Large tsunami waves over 10 feet are arriving within minutes. Catastrophic flooding is expected along the whole coastline.",
        impact_time: "15-30 minutes",
        official_actions: [
            "RUN TO HIGH GROUND NOW",
            "If you cannot get out, climb to the top floor or roof of a strong building",
            "Hold onto floating debris only as a last resort",
            "Do not return until officials give the all-clear",
            "If caught by the water, protect your head and stay afloat",
        ],
    },
];

static EARTHQUAKE: [HazardTemplate; 3] = [
    HazardTemplate {
        status: Status::Watch,
        description: "A moderate magnitude 5.5 to 6.0 earthquake has struck. Aftershocks are expected and minor structural damage is possible.",
        impact_time: "Ongoing",
        official_actions: [
            "Check yourself and others for injuries and give first aid if trained",
            "Look for structural damage, gas leaks, and electrical problems",
            "Expect aftershocks and be ready to take cover again",
            "Shut off the gas if you smell it or suspect a leak",
            "Stay out of damaged buildings until they are inspected",
        ],
    },
    HazardTemplate {
        status: Status::Warning,
        description: "A strong magnitude 6.0 to 6.9 earthquake has caused significant shaking. Buildings are damaged and gas leaks and fires are being reported.",
        impact_time: "Ongoing",
        official_actions: [
            "DROP, COVER, and HOLD ON during every aftershock",
            "Leave damaged buildings using stairs, never elevators",
            "Keep away from windows, tall furniture, and loose objects",
            "If trapped, do not light matches; tap on pipes to signal rescuers",
            "Stay away from the coast in case a tsunami follows",
        ],
    },
    HazardTemplate {
        status: Status::Emergency,
        description: "A major magnitude 7.0+ earthquake has caused widespread building collapse and mass casualties. Roads, power, and water are badly damaged.",
        impact_time: "Ongoing",
        official_actions: [
            "Protect yourself from falling debris and stay in a safe spot",
            "If trapped, cover your mouth and tap steadily so rescuers can find you",
            "Do not enter damaged structures; aftershocks can bring them down",
            "Avoid bridges, overpasses, and elevated roads",
            "Save phone battery; text instead of calling and call 911 only for emergencies",
        ],
    },
];

static HURRICANE: [HazardTemplate; 3] = [
    HazardTemplate {
        status: Status::Watch,
        description: "A Category 2 hurricane with 96-110 mph winds is approaching. A 6 to 8 foot storm surge is possible with heavy damage to roofs, trees, and power lines.",
        impact_time: "12-24 hours",
        official_actions: [
            "Finish preparations now: board windows and tie down outdoor items",
            "Store food and one gallon of water per person per day for 7 days",
            "Fill your gas tank and charge every device",
            "Go over the evacuation plan with your household",
            "Be ready to leave if authorities order an evacuation",
        ],
    },
    HazardTemplate {
        status: Status::Warning,
        description: "A Category 3-4 hurricane with 111-155 mph winds is about to make landfall. A 9 to 18 foot surge and catastrophic damage are expected.",
        impact_time: "6-12 hours",
        official_actions: [
            "Evacuate NOW if you live in a surge zone or a mobile home",
            "If you cannot leave, shelter in an interior room away from windows",
            "Turn off utilities if flooding is expected",
            "Go to a designated shelter if your home is not safe",
            "Stay inside for the whole storm; the calm eye does not mean it is over",
        ],
    },
    HazardTemplate {
        status: Status::Emergency,
        description: "A Category 4-5 hurricane with winds above 155 mph and a storm surge over 18 feet. Frame homes will be destroyed and the area may be uninhabitable for months.",
        impact_time: "3-6 hours",
        official_actions: [
            "LAST CHANCE TO EVACUATE; leave now if you can",
            "If you must stay, shelter in a small interior room, closet, or hallway",
            "Get under sturdy furniture and cover your head and body",
            "Stay away from windows and lie on the floor if glass breaks",
            "Do not go outside until authorities announce the all-clear",
        ],
    },
];
