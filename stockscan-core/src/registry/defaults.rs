//! Built-in provider table.
//!
//! Patterns are compiled case-insensitive; they are written without
//! delimiters or flags.

pub(crate) const BUILTIN_PROVIDERS: &[(&str, &[&str])] = &[
    ("Getty Images", &[r"gettyimages", r"gi-\d+"]),
    ("Shutterstock", &[r"shutterstock_\d+", r"shutterstock-\d+"]),
    ("iStockPhoto", &[r"istockphoto", r"iStock_\d+"]),
    ("Adobe Stock", &[r"adobestock_\d+", r"AdobeStock_\d+"]),
    (
        "Dreamstime",
        &[r"dreamstime", r"dreamstime_xl_\d+", r"dreamstimefree_\d+"],
    ),
    ("Pexels", &[r"pexels", r"pexels-photo-\d+"]),
    ("Unsplash", &[r"unsplash", r"photo-\d+-[a-f0-9]+"]),
    ("Depositphotos", &[r"depositphotos"]),
    ("123RF", &[r"123rf"]),
    ("Alamy", &[r"alamy"]),
    ("Bigstock", &[r"bigstock"]),
    ("Freepik", &[r"freepik"]),
    ("VectorStock", &[r"vectorstock"]),
    ("Pixabay", &[r"pixabay"]),
    ("RawPixel", &[r"rawpixel"]),
    ("StockVault", &[r"stockvault"]),
    ("Burst", &[r"burst"]),
    ("Kaboompics", &[r"kaboompics"]),
    ("Reshot", &[r"reshot"]),
    ("Envato Elements", &[r"envato", r"envato-elements"]),
    ("Canva", &[r"canva", r"canva-photo-editor"]),
    ("Picfair", &[r"picfair"]),
    ("Pond5", &[r"pond5"]),
    ("EyeEm", &[r"eyeem"]),
    ("Stocksy", &[r"stocksy", r"stocksy_tx\d+"]),
    ("Fotolia", &[r"fotolia", r"fotolia_\d+"]),
    ("Twenty20", &[r"twenty20"]),
    ("Pixnio", &[r"pixnio"]),
    ("Flickr", &[r"flickr", r"flickr_\d+"]),
    ("ISO Republic", &[r"isorepublic"]),
    ("Public Domain Pictures", &[r"publicdomainpictures"]),
    ("Picjumbo", &[r"picjumbo"]),
    ("Life of Pix", &[r"lifeofpix"]),
    ("Gratisography", &[r"gratisography"]),
    ("Magdeleine", &[r"magdeleine"]),
    ("Negative Space", &[r"negativespace"]),
    ("Styled Stock", &[r"styledstock"]),
    ("Death to Stock", &[r"deathtostock"]),
    ("SplitShire", &[r"splitshire"]),
    ("ShotStash", &[r"shotstash"]),
    ("FancyCrave", &[r"fancycrave"]),
    ("Skitterphoto", &[r"skitterphoto"]),
    ("LibreShot", &[r"libreshot"]),
    ("PikWizard", &[r"pikwizard"]),
    ("AllTheFreeStock", &[r"allthefreestock"]),
    ("FoodiesFeed", &[r"foodiesfeed"]),
    ("Travel Coffee Book", &[r"travelcoffeebook"]),
    ("Moose Photos", &[r"moosephotos", r"moose_\d+"]),
    ("Freestocks", &[r"freestocks"]),
    ("Good Stock Photos", &[r"goodstockphotos"]),
];
