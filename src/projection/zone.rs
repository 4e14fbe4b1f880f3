use std::fmt;
use std::str::FromStr;

// one letter per 8 degree band from -80, X stretches up to 84
const ZONE_LETTERS: &[u8; 20] = b"CDEFGHJKLMNPQRSTUVWX";

const MIN_LAT: f64 = -80.0;
const MAX_LAT: f64 = 84.0;

/// A UTM zone: longitude band number and latitude band letter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UtmZone {
    number: u8,
    letter: char,
}

impl UtmZone {
    pub fn new(number: u8, letter: char) -> Option<UtmZone> {
        let letter = letter.to_ascii_uppercase();
        if (1..=60).contains(&number) && letter.is_ascii() && ZONE_LETTERS.contains(&(letter as u8)) {
            Some(UtmZone { number, letter })
        } else {
            None
        }
    }

    /// The zone holding a geographic coordinate. `None` outside of the
    /// -80..=84 latitude range covered by UTM.
    pub fn containing(lon: f64, lat: f64) -> Option<UtmZone> {
        let letter = zone_letter(lat)?;
        Some(UtmZone {
            number: zone_number(lon, lat),
            letter,
        })
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn is_north(&self) -> bool {
        self.letter >= 'N'
    }

    // WGS 84 / UTM: 326xx up north, 327xx down south
    pub fn epsg_code(&self) -> u32 {
        let base = if self.is_north() { 32600 } else { 32700 };
        base + self.number as u32
    }

    pub fn epsg(&self) -> String {
        format!("EPSG:{}", self.epsg_code())
    }

    pub fn proj_string(&self) -> String {
        let south = if self.is_north() { "" } else { " +south" };
        format!("+proj=utm +zone={}{} +datum=WGS84 +units=m +no_defs", self.number, south)
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.number, self.letter)
    }
}

impl FromStr for UtmZone {
    type Err = String;

    // "32T", "7n", ...
    fn from_str(s: &str) -> Result<UtmZone, String> {
        let s = s.trim();
        let letter = s.chars().last().ok_or_else(|| "empty zone".to_owned())?;
        let digits = &s[..s.len() - letter.len_utf8()];
        let number: u8 = digits
            .parse()
            .map_err(|_| format!("`{}` does not start with a zone number", s))?;
        UtmZone::new(number, letter).ok_or_else(|| format!("`{}` is not a valid UTM zone", s))
    }
}

/// Longitude band 1..=60, with the Norway and Svalbard exceptions.
pub fn zone_number(lon: f64, lat: f64) -> u8 {
    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }
    if (72.0..=84.0).contains(&lat) && lon >= 0.0 {
        if lon < 9.0 {
            return 31;
        } else if lon < 21.0 {
            return 33;
        } else if lon < 33.0 {
            return 35;
        } else if lon < 42.0 {
            return 37;
        }
    }
    let band = ((lon + 180.0) / 6.0).floor() as i64 + 1;
    band.max(1).min(60) as u8
}

pub fn zone_letter(lat: f64) -> Option<char> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return None;
    }
    let index = (((lat - MIN_LAT) / 8.0).floor() as usize).min(ZONE_LETTERS.len() - 1);
    Some(ZONE_LETTERS[index] as char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_longitude_bands() {
        assert_eq!(zone_number(-180.0, 0.0), 1);
        assert_eq!(zone_number(-174.01, 0.0), 1);
        assert_eq!(zone_number(-174.0, 0.0), 2);
        assert_eq!(zone_number(7.1, 45.1), 32);
        assert_eq!(zone_number(12.5, 41.9), 33);
        assert_eq!(zone_number(-73.9, 40.7), 18);
        assert_eq!(zone_number(179.9, 0.0), 60);
        assert_eq!(zone_number(180.0, 0.0), 60);
    }

    #[test]
    fn norway_exception() {
        // Bergen
        assert_eq!(zone_number(5.3, 60.4), 32);
        assert_eq!(zone_number(2.9, 60.4), 31);
        assert_eq!(zone_number(12.0, 60.4), 33);
        assert_eq!(zone_number(5.3, 64.0), 31);
    }

    #[test]
    fn svalbard_exception() {
        assert_eq!(zone_number(8.9, 78.0), 31);
        assert_eq!(zone_number(15.6, 78.2), 33);
        assert_eq!(zone_number(25.0, 78.0), 35);
        assert_eq!(zone_number(40.0, 80.0), 37);
        assert_eq!(zone_number(45.0, 80.0), 38);
        assert_eq!(zone_number(-5.0, 80.0), 30);
    }

    #[test]
    fn latitude_letters() {
        assert_eq!(zone_letter(-80.0), Some('C'));
        assert_eq!(zone_letter(-79.5), Some('C'));
        assert_eq!(zone_letter(-0.1), Some('M'));
        assert_eq!(zone_letter(0.0), Some('N'));
        assert_eq!(zone_letter(45.1), Some('T'));
        assert_eq!(zone_letter(71.9), Some('W'));
        assert_eq!(zone_letter(72.0), Some('X'));
        assert_eq!(zone_letter(84.0), Some('X'));
        assert_eq!(zone_letter(84.1), None);
        assert_eq!(zone_letter(-80.1), None);
    }

    #[test]
    fn epsg_codes_follow_hemisphere() {
        let turin = UtmZone::containing(7.68, 45.07).unwrap();
        assert_eq!(turin.to_string(), "32T");
        assert_eq!(turin.epsg(), "EPSG:32632");

        let sydney = UtmZone::containing(151.2, -33.9).unwrap();
        assert_eq!(sydney.to_string(), "56H");
        assert_eq!(sydney.epsg_code(), 32756);
        assert!(sydney.proj_string().contains("+south"));

        assert!(UtmZone::containing(0.0, 85.0).is_none());
    }

    #[test]
    fn parse_zone() {
        assert_eq!("32T".parse::<UtmZone>(), Ok(UtmZone::new(32, 'T').unwrap()));
        assert_eq!("7n".parse::<UtmZone>().unwrap().to_string(), "7N");
        assert!("61N".parse::<UtmZone>().is_err());
        assert!("32I".parse::<UtmZone>().is_err());
        assert!("T".parse::<UtmZone>().is_err());
        assert!("".parse::<UtmZone>().is_err());
    }
}
