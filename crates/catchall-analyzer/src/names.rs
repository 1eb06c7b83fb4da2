//! A closed, bundled set of common first names (international, lower-case)
//! used by the pattern and name-likeness scorers. This is deliberately a
//! fixed list rather than a generated one — the scores above are calibrated
//! against it.

pub const FIRST_NAMES: &[&str] = &[
    "james", "john", "robert", "michael", "william", "david", "richard", "joseph", "thomas",
    "charles", "daniel", "matthew", "anthony", "mark", "paul", "steven", "andrew", "kenneth",
    "joshua", "kevin", "brian", "george", "edward", "ronald", "timothy", "jason", "jeffrey",
    "ryan", "jacob", "gary", "nicholas", "eric", "jonathan", "stephen", "larry", "justin",
    "scott", "brandon", "benjamin", "samuel", "frank", "gregory", "raymond", "alexander",
    "patrick", "jack", "dennis", "jerry", "tyler", "aaron", "henry", "peter", "douglas",
    "adam", "nathan", "zachary", "walter", "kyle", "noah", "ethan", "jeremy", "carl",
    "christian", "sean", "austin", "arthur", "lawrence", "wayne", "mary", "patricia",
    "jennifer", "linda", "elizabeth", "barbara", "susan", "jessica", "sarah", "karen",
    "nancy", "lisa", "margaret", "betty", "sandra", "ashley", "kimberly", "emily", "donna",
    "michelle", "carol", "amanda", "melissa", "deborah", "stephanie", "rebecca", "laura",
    "sharon", "cynthia", "kathleen", "amy", "angela", "shirley", "anna", "brenda", "pamela",
    "emma", "nicole", "helen", "samantha", "katherine", "christine", "debra", "rachel",
    "catherine", "maria", "heather", "diane", "olivia", "julie", "joyce", "victoria", "ruth",
    "virginia", "lauren", "kelly", "christina", "joan", "evelyn", "judith", "megan", "andrea",
    "cheryl", "hannah", "jacqueline", "martha", "gloria", "teresa", "sara", "janice", "marie",
    "julia", "grace", "judy", "theresa", "madison", "beverly", "denise", "marilyn", "amber",
    "danielle", "abigail", "brittany", "rose", "diana", "natalie", "sophia", "alexis",
    "lori", "kayla", "jane", "carlos", "juan", "jose", "luis", "miguel", "javier", "diego",
    "pedro", "pablo", "antonio", "manuel", "fernando", "ricardo", "sofia", "valentina",
    "camila", "isabella", "lucia", "gabriela", "elena", "carmen", "rosa", "ana", "yuki",
    "hiroshi", "kenji", "takeshi", "satoshi", "haruto", "sakura", "yui", "aoi", "wei", "jun",
    "ming", "hui", "fang", "li", "xin", "yan", "mohamed", "ahmed", "ali", "hassan", "omar",
    "khalid", "fatima", "aisha", "amina", "priya", "raj", "arjun", "amit", "neha", "anjali",
    "olga", "ivan", "dmitri", "sergei", "natasha", "irina", "tatiana", "anders", "erik",
    "lars", "freya", "ingrid", "liam", "oliver", "mason", "lucas", "oscar", "felix", "klaus",
    "hans", "greta", "petra", "stefan", "marco", "giulia", "giovanni", "francesca", "luca",
];

pub fn is_known_first_name(token: &str) -> bool {
    FIRST_NAMES.contains(&token)
}
