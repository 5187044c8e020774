//! GGA position report construction
//!
//! The caster uses the reported position to pick geographically relevant
//! corrections, and it validates the checksum, so the sentence has to be
//! byte-exact.

use bytes::Bytes;
use chrono::{NaiveTime, Timelike};

/// Normalizes a signed longitude into [0, 180] with an east/west flag.
///
/// Values above 180 wrap across the antimeridian into the western
/// hemisphere; values below -180 wrap back into the eastern hemisphere.
pub fn normalize_longitude(longitude: f64) -> (f64, char) {
    if longitude > 180.0 {
        (360.0 - longitude, 'W')
    } else if (-180.0..0.0).contains(&longitude) {
        (-longitude, 'W')
    } else if longitude < -180.0 {
        (longitude + 360.0, 'E')
    } else {
        (longitude, 'E')
    }
}

/// Normalizes a signed latitude into [0, 90] with a north/south flag.
pub fn normalize_latitude(latitude: f64) -> (f64, char) {
    if latitude < 0.0 {
        (-latitude, 'S')
    } else {
        (latitude, 'N')
    }
}

/// Builds the checksummed GGA sentence for a fixed position at the given
/// UTC time of day.
///
/// Coordinates are split into whole degrees and decimal minutes; the minute
/// field is zero-padded to 11 characters with 8 decimal places. Fix quality,
/// satellite count, dilution, and the geoid separation are fixed values. The
/// checksum is the XOR of every byte of the field list, rendered as two
/// uppercase hex digits.
pub fn gga_sentence(latitude: f64, longitude: f64, altitude: f64, time: NaiveTime) -> Bytes {
    let (lat, ns) = normalize_latitude(latitude);
    let (lon, ew) = normalize_longitude(longitude);

    let lat_deg = lat as u32;
    let lon_deg = lon as u32;
    let lat_min = (lat - lat_deg as f64) * 60.0;
    let lon_min = (lon - lon_deg as f64) * 60.0;

    let fields = format!(
        "GPGGA,{:02}{:02}{:02}.00,{:02}{:011.8},{},{:02}{:011.8},{},1,05,0.19,+00400,M,{:5.3},M,,",
        time.hour(),
        time.minute(),
        time.second(),
        lat_deg,
        lat_min,
        ns,
        lon_deg,
        lon_min,
        ew,
        altitude,
    );

    let checksum = fields.bytes().fold(0u8, |acc, b| acc ^ b);

    Bytes::from(format!("${}*{:02X}\r\n", fields, checksum))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longitude_normalization() {
        let cases = [
            (-200.0, 160.0, 'E'),
            (-180.0, 180.0, 'W'),
            (-0.001, 0.001, 'W'),
            (0.0, 0.0, 'E'),
            (179.999, 179.999, 'E'),
            (180.0, 180.0, 'E'),
            (200.0, 160.0, 'W'),
        ];

        for (input, expected, hemisphere) in cases {
            let (lon, flag) = normalize_longitude(input);
            assert!(
                (lon - expected).abs() < 1e-9,
                "longitude {} normalized to {}, expected {}",
                input,
                lon,
                expected
            );
            assert_eq!(flag, hemisphere, "hemisphere flag for {}", input);
            assert!((0.0..=180.0).contains(&lon));
        }
    }

    #[test]
    fn test_latitude_normalization() {
        assert_eq!(normalize_latitude(53.0), (53.0, 'N'));
        assert_eq!(normalize_latitude(0.0), (0.0, 'N'));
        assert_eq!(normalize_latitude(-45.5), (45.5, 'S'));
    }

    #[test]
    fn test_sentence_is_byte_exact() {
        let time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let sentence = gga_sentence(53.0, -1.0, 252.0, time);
        assert_eq!(
            &sentence[..],
            b"$GPGGA,120000.00,5300.00000000,N,0100.00000000,W,1,05,0.19,+00400,M,252.000,M,,*73\r\n"
        );
    }

    #[test]
    fn test_sentence_southern_wrapped() {
        // Latitude south of the equator, longitude wrapped across 180.
        let time = NaiveTime::from_hms_opt(6, 30, 15).unwrap();
        let sentence = gga_sentence(-45.5, 200.5, 7.0, time);
        assert_eq!(
            &sentence[..],
            b"$GPGGA,063015.00,4530.00000000,S,15930.00000000,W,1,05,0.19,+00400,M,7.000,M,,*55\r\n"
        );
    }

    #[test]
    fn test_checksum_is_field_xor() {
        let time = NaiveTime::from_hms_opt(23, 59, 58).unwrap();
        let sentence = gga_sentence(51.5, -0.25, 11.5, time);
        let text = std::str::from_utf8(&sentence).unwrap();

        let star = text.find('*').unwrap();
        let fields = &text[1..star];
        let rendered = &text[star + 1..star + 3];

        let expected = fields.bytes().fold(0u8, |acc, b| acc ^ b);
        assert_eq!(rendered, format!("{:02X}", expected));
        assert!(text.ends_with("\r\n"));
    }
}
