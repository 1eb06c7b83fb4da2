//! Bundled static lookup tables: disposable domains, free providers,
//! role-based local-part prefixes, and an ordered mail-provider substring
//! table. All comparisons are case-insensitive; the caller is expected to
//! have already lower-cased its input (`verify_types::domain_cache_key` or
//! `crate::normalize::fold`).

/// Known disposable / temporary-mailbox domains.
pub const DISPOSABLE_DOMAINS: &[&str] = &[
    "mailinator.com", "10minutemail.com", "guerrillamail.com", "guerrillamail.net",
    "guerrillamail.org", "guerrillamail.biz", "tempmail.com", "temp-mail.org", "throwawaymail.com",
    "yopmail.com", "yopmail.net", "yopmail.fr", "getnada.com", "trashmail.com", "trashmail.net",
    "dispostable.com", "mailnesia.com", "maildrop.cc", "mintemail.com", "sharklasers.com",
    "spamgourmet.com", "spam4.me", "mailcatch.com", "fakeinbox.com", "mytemp.email",
    "tempinbox.com", "mohmal.com", "emailondeck.com", "33mail.com", "anonbox.net",
    "dropmail.me", "discard.email", "discardmail.com", "burnermail.io", "moakt.cc",
    "moakt.com", "mailsac.com", "inboxbear.com", "tempail.com", "tempr.email",
    "armyspy.com", "cuvox.de", "dayrep.com", "einrot.com", "fleckens.hu",
    "gustr.com", "jourrapide.com", "rhyta.com", "superrito.com", "teleworm.us",
    "mailinator.net", "mailinator.org", "sogetthis.com", "spambog.com", "spambox.us",
    "spamfree24.org", "mt2015.com", "mt2014.com", "grr.la", "guerrillamailblock.com",
    "pokemail.net", "proxymail.eu", "rcpt.at", "sendspamhere.com", "tagyourself.com",
    "tempemail.co", "tempe-mail.com", "tempmailo.com", "tempymail.com", "throwam.com",
    "tmpeml.com", "tmpmail.org", "tmpmail.net", "mail-temporaire.fr", "mailme.lv",
    "trbvm.com", "uroid.com", "veryrealemail.com", "wegwerfmail.de", "wegwerfmail.net",
    "wegwerfmail.org", "wh4f.org", "zoemail.net", "instant-mail.de", "fake-mail.ml",
    "10minemail.com", "20minutemail.com", "anonymbox.com", "binkmail.com", "bobmail.info",
    "bugmenot.com", "chammy.info", "cool.fr.nf", "courriel.fr.nf", "curryworld.de",
    "deadaddress.com", "despam.it", "devnullmail.com", "dingbone.com", "disposableaddress.com",
    "disposableemailaddresses.com", "disposeamail.com", "dodgeit.com", "dodgit.com",
    "dontreg.com", "dontsendmespam.de", "e4ward.com", "explodemail.com", "fakemailgenerator.com",
    "filzmail.com", "front14.org", "garliclife.com", "haltospam.com", "hatespam.org",
    "hopemail.biz", "ieatspam.info", "ihateyoualot.info", "imails.info", "incognitomail.com",
    "insorg-mail.info", "jetable.net", "jetable.org", "kasmail.com", "keepmymail.com",
    "klassmaster.com", "klzlk.com", "kurzepost.de", "lifebyfood.com", "link2mail.net",
    "litedrop.com", "lookugly.com", "lortemail.dk", "lroid.com", "lukop.dk",
    "mail4trash.com", "mailbidon.com", "mailblocks.com", "mailboxclean.com",
    "mailboxxx.org", "maileater.com", "mailexpire.com", "mailfreeonline.com",
    "mailguard.me", "mailimate.com", "mailin8r.com", "mailmoat.com", "mailms.com",
    "mailtothis.com", "mailzilla.com", "mailzilla.org", "mbx.cc", "mega.zik.dj",
    "mierdamail.com", "mintemail.net", "mt2009.com", "msgos.com", "mt2011.com",
    "nepwk.com", "netmails.com", "netmails.net", "nobulk.com", "nomail2me.com",
    "nospam4.us", "nospamfor.us", "nowmymail.com", "objectmail.com", "obobbo.com",
    "onewaymail.com", "otherinbox.com", "ourklips.com", "owlpic.com", "pjjkp.com",
    "poofy.org", "pooae.com", "privacy.net", "punkass.com", "putthisinyourspamdatabase.com",
    "quickinbox.com", "rklips.com", "safe-mail.net", "safersignup.de", "safetymail.info",
    "sandelf.de", "saynotospams.com", "selfdestructingmail.com", "sendfree.org",
    "sharedmailbox.org", "shieldedmail.com", "shitmail.me", "shitware.nl",
];

/// Free consumer email providers (not disposable, but domains that
/// disqualify an address from being treated as a corporate contact).
pub const FREE_PROVIDERS: &[&str] = &[
    "gmail.com", "yahoo.com", "yahoo.co.uk", "yahoo.co.in", "yahoo.fr", "yahoo.de",
    "hotmail.com", "hotmail.co.uk", "hotmail.fr", "outlook.com", "outlook.co.uk",
    "live.com", "live.co.uk", "msn.com", "aol.com", "aim.com", "icloud.com", "me.com",
    "mac.com", "protonmail.com", "proton.me", "pm.me", "zoho.com", "zohomail.com",
    "mail.com", "gmx.com", "gmx.de", "gmx.net", "gmx.at", "web.de", "t-online.de",
    "yandex.com", "yandex.ru", "mail.ru", "rambler.ru", "inbox.ru", "bk.ru",
    "list.ru", "qq.com", "163.com", "126.com", "sina.com", "sohu.com", "foxmail.com",
    "naver.com", "daum.net", "hanmail.net", "rediffmail.com", "126.net",
    "fastmail.com", "fastmail.fm", "hushmail.com", "tutanota.com", "tutanota.de",
    "posteo.de", "posteo.net", "mailbox.org", "runbox.com", "lycos.com",
    "excite.com", "juno.com", "netzero.net", "earthlink.net", "comcast.net",
    "verizon.net", "att.net", "sbcglobal.net", "bellsouth.net", "cox.net",
    "charter.net", "optonline.net", "frontier.com", "centurylink.net",
    "btinternet.com", "sky.com", "virginmedia.com", "talktalk.net", "blueyonder.co.uk",
    "ntlworld.com", "orange.fr", "laposte.net", "free.fr", "wanadoo.fr", "sfr.fr",
    "libero.it", "virgilio.it", "tiscali.it", "alice.it", "tin.it",
    "terra.com", "terra.com.br", "uol.com.br", "bol.com.br", "ig.com.br",
    "seznam.cz", "centrum.cz", "onet.pl", "wp.pl", "interia.pl", "o2.pl",
    "abv.bg", "mail.bg", "indexmail.bg", "freemail.hu", "citromail.hu",
    "inbox.lv", "inbox.lt", "mailcity.com", "walla.co.il", "walla.com",
    "rocketmail.com", "ymail.com", "163.com.cn", "139.com", "yeah.net",
];

/// Known role-based local-part prefixes. Compared after stripping the
/// `._-` separators that commonly decorate a role address (`no-reply`,
/// `no_reply`, `noreply` all collapse to the same key).
pub const ROLE_BASED_PREFIXES: &[&str] = &[
    "admin", "administrator", "webmaster", "hostmaster", "postmaster", "root",
    "info", "contact", "support", "help", "helpdesk", "service", "services",
    "sales", "marketing", "billing", "accounts", "accounting", "finance",
    "hr", "careers", "jobs", "recruiting", "recruitment", "legal", "compliance",
    "privacy", "security", "abuse", "spam", "noreply", "donotreply", "donot",
    "no", "reply", "mailer", "mailerdaemon", "daemon", "bounce", "bounces",
    "newsletter", "newsletters", "news", "press", "media", "pr", "media relations",
    "feedback", "enquiries", "enquiry", "inquiries", "inquiry", "general",
    "office", "team", "staff", "people", "talent", "jobsapplications",
    "customerservice", "customercare", "customer", "clientservices", "client",
    "clients", "partners", "partnerships", "affiliates", "affiliate",
    "orders", "order", "shipping", "returns", "refunds", "payments", "payment",
    "invoices", "invoice", "purchasing", "procurement", "vendor", "vendors",
    "supplier", "suppliers", "it", "itsupport", "tech", "techsupport",
    "helpdesk2", "operations", "ops", "devops", "engineering", "dev",
    "developer", "developers", "api", "apisupport", "webadmin", "sysadmin",
    "system", "systems", "noc", "monitoring", "alerts", "alert", "notifications",
    "notification", "notify", "updates", "update", "subscribe", "subscriptions",
    "subscription", "unsubscribe", "list", "lists", "listserv", "majordomo",
    "mailman", "moderator", "moderators", "editor", "editors", "webmail",
    "ftp", "dns", "mx", "smtp", "pop", "imap", "ns", "www", "web",
    "office365", "exchange", "calendar", "scheduling", "events", "event",
    "registration", "registrations", "signup", "signups", "login", "account",
    "accountverification", "verification", "verify", "confirm", "confirmation",
];

/// Ordered mail-provider detection table: MX hostname substring → display
/// name. First match wins, so more specific substrings (Google Workspace's
/// legacy `aspmx.l.google.com` vs the generic `google.com`) must be listed
/// before the broader ones they'd otherwise be shadowed by.
pub const PROVIDER_SUBSTRINGS: &[(&str, &str)] = &[
    ("aspmx.l.google.com", "Google Workspace"),
    ("google.com", "Google"),
    ("googlemail.com", "Google"),
    ("mail.protection.outlook.com", "Microsoft 365"),
    ("protection.outlook.com", "Microsoft 365"),
    ("outlook.com", "Microsoft 365"),
    ("messaging.microsoft.com", "Microsoft 365"),
    ("yahoodns.net", "Yahoo"),
    ("amazonses.com", "Amazon SES"),
    ("inbound-smtp.us-east-1.amazonaws.com", "Amazon SES"),
    ("pphosted.com", "Proofpoint"),
    ("mimecast.com", "Mimecast"),
    ("barracudanetworks.com", "Barracuda"),
    ("messagelabs.com", "Symantec Email Security"),
    ("zoho.com", "Zoho Mail"),
    ("zohomail.com", "Zoho Mail"),
    ("protonmail.ch", "Proton Mail"),
    ("mailgun.org", "Mailgun"),
    ("sendgrid.net", "SendGrid"),
    ("mailchimp.com", "Mailchimp"),
    ("mandrillapp.com", "Mandrill"),
    ("mailroute.net", "MailRoute"),
    ("fireeye.com", "FireEye Email Security"),
    ("cloudfilter.net", "McAfee SaaS"),
    ("trendmicro.com", "Trend Micro"),
    ("forcepoint.com", "Forcepoint"),
    ("emailsrvr.com", "Rackspace Email"),
    ("secureserver.net", "GoDaddy Email"),
    ("exmail.qq.com", "Tencent Exmail"),
    ("qq.com", "Tencent QQ Mail"),
    ("163.com", "NetEase 163"),
    ("ovh.net", "OVH Mail"),
    ("fastmail.com", "Fastmail"),
    ("yandex.net", "Yandex Mail"),
    ("mail.ru", "Mail.Ru"),
];
