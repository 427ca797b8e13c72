//! Supported distributions
//!
//! Packages are pushed into an `<os>/<version>` bucket on the remote service.
//! Only names from the table below are accepted; anything else is rejected
//! before a client is ever built.

use std::fmt;

use phf::phf_set;

use crate::error::{CoreError, Result};

// =============================================================================
// SUPPORTED DISTRIBUTIONS - grouped per family, oldest release first
// =============================================================================

static DISTRIBUTIONS: phf::Set<&'static str> = phf_set! {
    // elementary OS
    "elementaryos/jupiter",
    "elementaryos/luna",
    "elementaryos/freya",
    "elementaryos/loki",
    "elementaryos/juno",
    "elementaryos/hera",
    "elementaryos/odin",
    "elementaryos/jolnir",
    "elementaryos/horus",

    // SUSE Linux Enterprise Server
    "sles/11.4",
    "sles/12.0",
    "sles/12.1",
    "sles/12.2",
    "sles/12.3",
    "sles/12.4",
    "sles/12.5",
    "sles/15.0",
    "sles/15.1",
    "sles/15.2",
    "sles/15.3",
    "sles/15.4",
    "sles/15.5",

    // Ubuntu
    "ubuntu/warty",
    "ubuntu/hoary",
    "ubuntu/breezy",
    "ubuntu/dapper",
    "ubuntu/edgy",
    "ubuntu/feisty",
    "ubuntu/gutsy",
    "ubuntu/hardy",
    "ubuntu/intrepid",
    "ubuntu/jaunty",
    "ubuntu/karmic",
    "ubuntu/lucid",
    "ubuntu/maverick",
    "ubuntu/natty",
    "ubuntu/oneiric",
    "ubuntu/precise",
    "ubuntu/quantal",
    "ubuntu/raring",
    "ubuntu/saucy",
    "ubuntu/trusty",
    "ubuntu/utopic",
    "ubuntu/vivid",
    "ubuntu/wily",
    "ubuntu/xenial",
    "ubuntu/yakkety",
    "ubuntu/zesty",
    "ubuntu/artful",
    "ubuntu/bionic",
    "ubuntu/cosmic",
    "ubuntu/disco",
    "ubuntu/eoan",
    "ubuntu/focal",
    "ubuntu/groovy",
    "ubuntu/hirsute",
    "ubuntu/impish",
    "ubuntu/jammy",
    "ubuntu/kinetic",
    "ubuntu/lunar",
    "ubuntu/mantic",
    "ubuntu/noble",

    // Debian
    "debian/etch",
    "debian/lenny",
    "debian/squeeze",
    "debian/wheezy",
    "debian/jessie",
    "debian/stretch",
    "debian/buster",
    "debian/bullseye",
    "debian/bookworm",
    "debian/trixie",

    // Raspbian
    "raspbian/wheezy",
    "raspbian/jessie",
    "raspbian/stretch",
    "raspbian/buster",
    "raspbian/bullseye",
    "raspbian/bookworm",

    // openSUSE
    "opensuse/13.1",
    "opensuse/13.2",
    "opensuse/42.1",
    "opensuse/42.2",
    "opensuse/42.3",
    "opensuse/15.0",
    "opensuse/15.1",
    "opensuse/15.2",
    "opensuse/15.3",
    "opensuse/15.4",
    "opensuse/15.5",

    // Fedora
    "fedora/14",
    "fedora/15",
    "fedora/16",
    "fedora/17",
    "fedora/18",
    "fedora/19",
    "fedora/20",
    "fedora/21",
    "fedora/22",
    "fedora/23",
    "fedora/24",
    "fedora/25",
    "fedora/26",
    "fedora/27",
    "fedora/28",
    "fedora/29",
    "fedora/30",
    "fedora/31",
    "fedora/32",
    "fedora/33",
    "fedora/34",
    "fedora/35",
    "fedora/36",
    "fedora/37",
    "fedora/38",
    "fedora/39",
    "fedora/40",

    // Linux Mint
    "linuxmint/petra",
    "linuxmint/qiana",
    "linuxmint/rebecca",
    "linuxmint/rafaela",
    "linuxmint/rosa",
    "linuxmint/sarah",
    "linuxmint/serena",
    "linuxmint/sonya",
    "linuxmint/sylvia",
    "linuxmint/tara",
    "linuxmint/tessa",
    "linuxmint/tina",
    "linuxmint/tricia",
    "linuxmint/ulyana",
    "linuxmint/ulyssa",
    "linuxmint/uma",
    "linuxmint/una",
    "linuxmint/vanessa",
    "linuxmint/vera",
    "linuxmint/victoria",
    "linuxmint/virginia",
    "linuxmint/wilma",

    // Yocto Poky
    "poky/jethro",
    "poky/krogoth",

    // Scientific Linux
    "scientific/5",
    "scientific/6",
    "scientific/7",

    // Oracle Linux
    "ol/5",
    "ol/6",
    "ol/7",
    "ol/8",
    "ol/9",

    // Enterprise Linux (RHEL, CentOS)
    "el/5",
    "el/6",
    "el/7",
    "el/8",
    "el/9",
};

/// A supported `<os>/<version>` distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Distribution {
    name: &'static str,
}

impl Distribution {
    /// Validate a distribution name against the supported table
    pub fn parse(name: &str) -> Result<Self> {
        DISTRIBUTIONS
            .get_key(name)
            .map(|&canonical| Self { name: canonical })
            .ok_or_else(|| {
                CoreError::config(format!("Distribution name not supported: {}", name))
            })
    }

    /// Whether `name` is in the supported table
    pub fn is_supported(name: &str) -> bool {
        DISTRIBUTIONS.contains(name)
    }

    /// All supported distribution names, in no particular order
    pub fn supported() -> impl Iterator<Item = &'static str> {
        DISTRIBUTIONS.iter().copied()
    }

    pub fn as_str(&self) -> &'static str {
        self.name
    }

    /// The OS part, e.g. `debian` for `debian/jessie`
    pub fn os(&self) -> &'static str {
        self.split().0
    }

    /// The release part, e.g. `jessie` for `debian/jessie`
    pub fn release(&self) -> &'static str {
        self.split().1
    }

    fn split(&self) -> (&'static str, &'static str) {
        // Every table entry contains exactly one separator
        self.name.split_once('/').unwrap_or((self.name, ""))
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
